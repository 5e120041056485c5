use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storefront_core::{
    get_path, BaseProductId, CatalogId, DomainResult, DomainError, ProductField, ProductId,
    TemplateKey,
};

fn empty_map() -> Value {
    Value::Object(Map::new())
}

/// Creation/modification stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

impl Default for Audit {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

/// One entry of a product's external-identity list.
///
/// Upstream systems (XMPie, BigCommerce, the storefront itself) each record
/// their own id for the same product. The "StoreFront" entry always mirrors
/// the primary id; [`crate::clone::clone_product`] enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub system: String,
    pub id: String,
}

impl IdentityRecord {
    pub fn storefront(id: impl Into<String>) -> Self {
        Self {
            system: "StoreFront".to_string(),
            id: id.into(),
        }
    }

    pub fn is_storefront(&self) -> bool {
        self.system.trim().eq_ignore_ascii_case("storefront")
    }
}

/// A reusable template/class supplying inheritable defaults. Never placed in
/// a catalog. Deleting one is legal even while products still reference it;
/// resolution then degrades to "no defaults" (integrity warning, not error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProduct {
    pub id: BaseProductId,
    pub name: String,
    /// The inherited configuration surface (capability flags, pricing config,
    /// media, ...). Free-form map.
    #[serde(default = "empty_map")]
    pub defaults: Value,
    /// Editor metadata; may carry `defaultTemplateKey`.
    #[serde(default = "empty_map")]
    pub schema_hints: Value,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub audit: Audit,
}

impl BaseProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("base product name must not be empty"));
        }
        Ok(())
    }

    /// Template hint for precedence rule #2, if present and non-blank.
    pub fn default_template_key(&self) -> Option<TemplateKey> {
        let path = "defaultTemplateKey".parse().ok()?;
        get_path(&self.schema_hints, &path)?
            .as_str()?
            .parse()
            .ok()
    }
}

/// A concrete catalog-facing product.
///
/// `overrides` is sparse: a key present at any depth means "this product
/// explicitly sets this field", regardless of value (including `null` and
/// `false`). `extensions` is merged after overrides and is meant for
/// system-derived augmentation, not author choices. The legacy top-level
/// fields predate inheritance and survive for backward compatibility; see
/// [`crate::resolver::resolve`] for their exact precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub base_product_id: Option<BaseProductId>,
    #[serde(default = "empty_map")]
    pub overrides: Value,
    #[serde(default = "empty_map")]
    pub extensions: Value,
    /// Legacy: pre-inheritance product definition stored at the top level.
    #[serde(default)]
    pub product_definition: Option<Value>,
    /// Legacy capability flags.
    #[serde(default)]
    pub capabilities: Option<Value>,
    /// Legacy per-product configuration.
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub interaction_type: Option<String>,
    /// Invariant: non-empty. A product outside every catalog is unreachable.
    pub catalog_ids: Vec<CatalogId>,
    /// Explicit template selection; precedence rule #1.
    #[serde(default)]
    pub template_key: Option<TemplateKey>,
    #[serde(default)]
    pub identity_records: Vec<IdentityRecord>,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub audit: Audit,
}

impl Product {
    /// Invariants enforced on create and clone, never silently coerced.
    pub fn validate(&self) -> DomainResult<()> {
        if self.catalog_ids.is_empty() {
            return Err(DomainError::validation(
                "catalogIds must be a non-empty list; a product must belong to at least one catalog",
            ));
        }
        if self.display_name().is_none() && self.base_product_id.is_none() {
            return Err(DomainError::validation(
                "ProductDefinition.Name is required when no base product is referenced",
            ));
        }
        Ok(())
    }

    /// The author-visible name, before inheritance: overrides first, then the
    /// legacy top-level definition.
    pub fn display_name(&self) -> Option<&str> {
        let path = ProductField::Name.path();
        if let Some(name) = get_path(&self.overrides, &path).and_then(Value::as_str) {
            if !name.trim().is_empty() {
                return Some(name);
            }
        }
        let name = self.product_definition.as_ref()?.get("Name")?.as_str()?;
        if name.trim().is_empty() { None } else { Some(name) }
    }

    /// True when `overrides` carries no keys at all, which switches the legacy
    /// top-level definition into implicit-override mode during resolution.
    pub fn has_empty_overrides(&self) -> bool {
        self.overrides.as_object().is_none_or(|m| m.is_empty())
    }
}
