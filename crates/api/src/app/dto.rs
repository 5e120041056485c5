//! Request payloads and their conversion into domain types.
//!
//! Payloads carry ids as raw strings so every id goes through `FromStr`
//! validation exactly once, here. Missing ids on create are generated.

use serde::Deserialize;
use serde_json::{Map, Value};

use storefront_catalog::{Catalog, ProductPlacement};
use storefront_core::{
    BaseProductId, CatalogId, DomainResult, ProductId, TemplateKey,
};
use storefront_infra::Page;
use storefront_products::{Audit, BaseProduct, IdentityRecord, Product};
use storefront_templates::{ProductTemplate, RenderBlock};

fn empty_map() -> Value {
    Value::Object(Map::new())
}

fn parse_opt<T: std::str::FromStr>(value: Option<&str>) -> Result<Option<T>, T::Err> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

// -------------------------
// Query parameters
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::clamped(self.page.unwrap_or(1), self.page_size.unwrap_or(10))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogChildrenQuery {
    pub parent_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl CatalogChildrenQuery {
    pub fn page(&self) -> Page {
        Page::clamped(self.page.unwrap_or(1), self.page_size.unwrap_or(10))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

// -------------------------
// Products
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: Option<String>,
    pub base_product_id: Option<String>,
    #[serde(default = "empty_map")]
    pub overrides: Value,
    #[serde(default = "empty_map")]
    pub extensions: Value,
    pub product_definition: Option<Value>,
    pub capabilities: Option<Value>,
    pub config: Option<Value>,
    pub product_type: Option<String>,
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub catalog_ids: Vec<String>,
    pub template_key: Option<String>,
    pub identity_records: Option<Vec<IdentityRecord>>,
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
}

impl ProductPayload {
    pub fn into_new_product(self) -> DomainResult<Product> {
        let id = match parse_opt::<ProductId>(self.id.as_deref())? {
            Some(id) => id,
            None => ProductId::generate(),
        };
        self.build(id)
    }

    /// The id comes from the URL; an id in the body is ignored.
    pub fn into_updated_product(self, id: ProductId) -> DomainResult<Product> {
        self.build(id)
    }

    fn build(self, id: ProductId) -> DomainResult<Product> {
        let catalog_ids = self
            .catalog_ids
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<CatalogId>, _>>()?;
        let identity_records = self
            .identity_records
            .unwrap_or_else(|| vec![IdentityRecord::storefront(id.as_str())]);

        Ok(Product {
            base_product_id: parse_opt::<BaseProductId>(self.base_product_id.as_deref())?,
            overrides: self.overrides,
            extensions: self.extensions,
            product_definition: self.product_definition,
            capabilities: self.capabilities,
            config: self.config,
            product_type: self.product_type,
            interaction_type: self.interaction_type,
            catalog_ids,
            template_key: parse_opt::<TemplateKey>(self.template_key.as_deref())?,
            identity_records,
            status_id: self.status_id,
            display_order: self.display_order,
            audit: Audit::default(),
            id,
        })
    }
}

// -------------------------
// Base products
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProductPayload {
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "empty_map")]
    pub defaults: Value,
    #[serde(default = "empty_map")]
    pub schema_hints: Value,
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
}

impl BaseProductPayload {
    pub fn into_new_base(self) -> DomainResult<BaseProduct> {
        let id = match parse_opt::<BaseProductId>(self.id.as_deref())? {
            Some(id) => id,
            None => BaseProductId::generate(),
        };
        self.build(id)
    }

    pub fn into_updated_base(self, id: BaseProductId) -> DomainResult<BaseProduct> {
        self.build(id)
    }

    fn build(self, id: BaseProductId) -> DomainResult<BaseProduct> {
        Ok(BaseProduct {
            id,
            name: self.name.trim().to_string(),
            defaults: self.defaults,
            schema_hints: self.schema_hints,
            status_id: self.status_id,
            display_order: self.display_order,
            audit: Audit::default(),
        })
    }
}

// -------------------------
// Catalogs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    pub id: Option<String>,
    pub name: String,
    pub parent_id: Option<String>,
    pub status_id: Option<i64>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub products: Vec<ProductPlacement>,
}

impl CatalogPayload {
    pub fn into_new_catalog(self) -> DomainResult<Catalog> {
        let id = match parse_opt::<CatalogId>(self.id.as_deref())? {
            Some(id) => id,
            None => CatalogId::generate(),
        };
        self.build(id)
    }

    pub fn into_updated_catalog(self, id: CatalogId) -> DomainResult<Catalog> {
        self.build(id)
    }

    fn build(self, id: CatalogId) -> DomainResult<Catalog> {
        Ok(Catalog {
            id,
            name: self.name.trim().to_string(),
            parent_id: parse_opt::<CatalogId>(self.parent_id.as_deref())?,
            status_id: self.status_id,
            display_order: self.display_order,
            products: self.products,
            children: None,
            audit: Audit::default(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub product_id: String,
}

// -------------------------
// Templates
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    pub key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<RenderBlock>,
    #[serde(default)]
    pub is_default: bool,
}

impl TemplatePayload {
    pub fn into_new_template(self) -> DomainResult<ProductTemplate> {
        let key = match parse_opt::<TemplateKey>(self.key.as_deref())? {
            Some(key) => key,
            None => TemplateKey::generate(),
        };
        self.build(key)
    }

    pub fn into_updated_template(self, key: TemplateKey) -> DomainResult<ProductTemplate> {
        self.build(key)
    }

    fn build(self, key: TemplateKey) -> DomainResult<ProductTemplate> {
        Ok(ProductTemplate {
            key,
            name: self.name.trim().to_string(),
            blocks: self.blocks,
            is_default: self.is_default,
        })
    }
}
