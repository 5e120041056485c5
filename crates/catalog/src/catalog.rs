use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use storefront_core::{CatalogId, DomainError, DomainResult, ProductId};
use storefront_products::{Audit, ResolvedProduct};

/// One entry of a catalog's ordered product list. The placement order is the
/// catalog's own, independent of any per-product `display_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPlacement {
    pub product_id: ProductId,
    #[serde(default)]
    pub display_order: i64,
}

/// A node in the rooted catalog tree. `parent_id == None` denotes a root.
///
/// The parent graph must stay acyclic; writes are checked (see
/// [`crate::tree::would_create_cycle`]) and every tree walk additionally
/// terminates on revisits as a permanent contract against corrupt data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CatalogId>,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub products: Vec<ProductPlacement>,
    /// Explicit child-id list, present only when the fetch included it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CatalogId>>,
    #[serde(default)]
    pub audit: Audit,
}

impl Catalog {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("catalog name must not be empty"));
        }
        Ok(())
    }

    /// Append a product placement at the end of the stored order.
    pub fn with_product_added(mut self, product_id: ProductId) -> Self {
        if self.products.iter().any(|p| p.product_id == product_id) {
            return self;
        }
        let next = self
            .products
            .iter()
            .map(|p| p.display_order)
            .max()
            .unwrap_or(0)
            + 1;
        self.products.push(ProductPlacement {
            product_id,
            display_order: next,
        });
        self
    }

    pub fn with_product_removed(mut self, product_id: &ProductId) -> Self {
        self.products.retain(|p| &p.product_id != product_id);
        self
    }
}

/// Order materialized products for a catalog page.
///
/// Three-level sort, stable and deterministic: the catalog's stored placement
/// order wins, ties broken by the product's own `display_order`, then by id
/// lexicographically. Products missing from the placement list sort as
/// placement order 0 (matching how partially-migrated catalogs behaved).
pub fn sort_catalog_products(
    placements: &[ProductPlacement],
    mut products: Vec<ResolvedProduct>,
) -> Vec<ResolvedProduct> {
    let placement_order: HashMap<&ProductId, i64> = placements
        .iter()
        .map(|p| (&p.product_id, p.display_order))
        .collect();

    products.sort_by(|a, b| {
        let pa = placement_order.get(&a.id).copied().unwrap_or(0);
        let pb = placement_order.get(&b.id).copied().unwrap_or(0);
        pa.cmp(&pb)
            .then_with(|| a.display_order.cmp(&b.display_order))
            .then_with(|| a.id.cmp(&b.id))
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(id: &str, display_order: i64) -> ResolvedProduct {
        ResolvedProduct {
            id: id.parse().unwrap(),
            base_product_id: None,
            template_key: None,
            identity_records: vec![],
            status_id: None,
            display_order,
            document: json!({}),
            base_missing: false,
        }
    }

    fn placement(id: &str, order: i64) -> ProductPlacement {
        ProductPlacement {
            product_id: id.parse().unwrap(),
            display_order: order,
        }
    }

    #[test]
    fn catalog_stored_order_wins_over_product_order() {
        // Catalog says B first even though A's own display_order is larger.
        let placements = vec![placement("A", 2), placement("B", 1)];
        let products = vec![resolved("A", 5), resolved("B", 1)];

        let sorted = sort_catalog_products(&placements, products);
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn ties_fall_back_to_product_order_then_id() {
        let placements = vec![placement("A", 1), placement("B", 1), placement("C", 1)];
        let products = vec![resolved("C", 2), resolved("B", 1), resolved("A", 1)];

        let sorted = sort_catalog_products(&placements, products);
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn unplaced_products_sort_as_order_zero() {
        let placements = vec![placement("A", 3)];
        let products = vec![resolved("A", 0), resolved("Z", 0)];

        let sorted = sort_catalog_products(&placements, products);
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["Z", "A"]);
    }

    #[test]
    fn add_product_appends_after_current_max() {
        let catalog = Catalog {
            id: "CAT1".parse().unwrap(),
            name: "Mugs".to_string(),
            parent_id: None,
            status_id: None,
            display_order: 0,
            products: vec![placement("A", 2), placement("B", 7)],
            children: None,
            audit: Audit::default(),
        };
        let updated = catalog.with_product_added("C".parse().unwrap());
        assert_eq!(updated.products.last().unwrap().display_order, 8);

        // Adding an existing product is a no-op.
        let again = updated.clone().with_product_added("C".parse().unwrap());
        assert_eq!(again, updated);
    }

    #[test]
    fn remove_product_drops_placement() {
        let catalog = Catalog {
            id: "CAT1".parse().unwrap(),
            name: "Mugs".to_string(),
            parent_id: None,
            status_id: None,
            display_order: 0,
            products: vec![placement("A", 1), placement("B", 2)],
            children: None,
            audit: Audit::default(),
        };
        let updated = catalog.with_product_removed(&"A".parse().unwrap());
        assert_eq!(updated.products, vec![placement("B", 2)]);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let catalog = Catalog {
            id: "CAT1".parse().unwrap(),
            name: "  ".to_string(),
            parent_id: None,
            status_id: None,
            display_order: 0,
            products: vec![],
            children: None,
            audit: Audit::default(),
        };
        assert!(catalog.validate().is_err());
    }
}
