//! Typed paths for schema-known product fields.
//!
//! Editors used to build dot-strings by concatenation all over the UI; any
//! typo silently read or wrote the wrong field. Where the schema is known the
//! path is an enum variant instead, and free-form [`DocPath`] strings are
//! reserved for the genuinely open-ended `extensions` bag.

use crate::path::DocPath;

/// Closed set of well-known resolved-document fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    ShortDescription,
    DescriptionHtml,
    Images,
    Capabilities,
    Purchasable,
    Config,
    BasePrice,
    ProductType,
    InteractionType,
}

impl ProductField {
    pub fn dotted(self) -> &'static str {
        match self {
            ProductField::Name => "ProductDefinition.Name",
            ProductField::ShortDescription => "ProductDefinition.ShortDescription",
            ProductField::DescriptionHtml => "ProductDefinition.DescriptionHtml",
            ProductField::Images => "ProductDefinition.Images",
            ProductField::Capabilities => "capabilities",
            ProductField::Purchasable => "capabilities.purchasable",
            ProductField::Config => "config",
            ProductField::BasePrice => "config.pricing.basePrice",
            ProductField::ProductType => "productType",
            ProductField::InteractionType => "interactionType",
        }
    }

    pub fn path(self) -> DocPath {
        // Infallible: every dotted form above is a valid path.
        self.dotted().parse().unwrap_or_else(|_| unreachable!())
    }
}

impl From<ProductField> for DocPath {
    fn from(field: ProductField) -> Self {
        field.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_parses_to_a_path() {
        for field in [
            ProductField::Name,
            ProductField::ShortDescription,
            ProductField::DescriptionHtml,
            ProductField::Images,
            ProductField::Capabilities,
            ProductField::Purchasable,
            ProductField::Config,
            ProductField::BasePrice,
            ProductField::ProductType,
            ProductField::InteractionType,
        ] {
            assert_eq!(field.path().dotted(), field.dotted());
        }
    }
}
