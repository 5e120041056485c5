//! Cloning products and base products under an identity/validity contract.
//!
//! Cloning is pure: it builds the new document and enforces invariants here,
//! not downstream. Id-collision checking stays with the repository
//! (exists-then-insert); a conflict is surfaced verbatim, never retried with
//! a mutated id.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use storefront_core::{BaseProductId, CatalogId, DomainError, DomainResult, ProductId};

use crate::product::{Audit, BaseProduct, IdentityRecord, Product};

fn default_keep_catalog_ids() -> bool {
    true
}

/// Options accepted by `POST /products/:id/clone`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneProductOptions {
    pub new_id: Option<String>,
    pub new_name: Option<String>,
    pub suffix: Option<String>,
    pub catalog_id: Option<CatalogId>,
    pub catalog_ids: Option<Vec<CatalogId>>,
    #[serde(default = "default_keep_catalog_ids")]
    pub keep_catalog_ids: bool,
}

impl Default for CloneProductOptions {
    fn default() -> Self {
        Self {
            new_id: None,
            new_name: None,
            suffix: None,
            catalog_id: None,
            catalog_ids: None,
            keep_catalog_ids: true,
        }
    }
}

/// Options accepted by `POST /bases/:id/clone`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneBaseProductOptions {
    pub new_id: Option<String>,
    pub new_name: Option<String>,
    pub suffix: Option<String>,
}

fn clone_id(source_id: &str, new_id: Option<&str>, suffix: Option<&str>, now: DateTime<Utc>) -> String {
    match new_id.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None => {
            let suffix = suffix
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("COPY");
            format!("{source_id}_{suffix}_{}", now.timestamp_millis())
        }
    }
}

fn clone_name(source_name: &str, new_name: Option<&str>) -> String {
    match new_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None => format!("{source_name} (Copy)"),
    }
}

/// Clone a product.
///
/// Catalog membership precedence: `catalog_ids` > `catalog_id` > the source's
/// own list (when `keep_catalog_ids`, the default) > a [`DomainError::Validation`]
/// naming the missing requirement. An empty list is never accepted silently:
/// a product outside every catalog is unreachable and invisible.
pub fn clone_product(
    source: &Product,
    opts: &CloneProductOptions,
    now: DateTime<Utc>,
) -> DomainResult<Product> {
    let new_id: ProductId = clone_id(
        source.id.as_str(),
        opts.new_id.as_deref(),
        opts.suffix.as_deref(),
        now,
    )
    .parse()?;

    let catalog_ids = if let Some(ids) = opts.catalog_ids.as_ref().filter(|ids| !ids.is_empty()) {
        ids.clone()
    } else if let Some(id) = &opts.catalog_id {
        vec![id.clone()]
    } else if opts.keep_catalog_ids {
        source.catalog_ids.clone()
    } else {
        Vec::new()
    };

    if catalog_ids.is_empty() {
        return Err(DomainError::validation(
            "catalogIds is required to clone a product: provide catalogId or catalogIds, \
             or clone from a product that already has catalog memberships",
        ));
    }

    // Exactly one StoreFront identity entry, equal to the new id; everything
    // else is copied verbatim.
    let mut identity_records: Vec<IdentityRecord> = source
        .identity_records
        .iter()
        .filter(|rec| !rec.is_storefront())
        .cloned()
        .collect();
    identity_records.insert(0, IdentityRecord::storefront(new_id.as_str()));

    let source_name = source.display_name().unwrap_or(source.id.as_str());
    let new_name = clone_name(source_name, opts.new_name.as_deref());

    let mut product_definition = source
        .product_definition
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));
    if let Some(map) = product_definition.as_object_mut() {
        map.insert("Name".to_string(), serde_json::Value::String(new_name));
    }

    Ok(Product {
        id: new_id,
        catalog_ids,
        identity_records,
        product_definition: Some(product_definition),
        audit: Audit::at(now),
        ..source.clone()
    })
}

/// Clone a base product. Bases are never catalog members, so the only
/// requirement is a fresh, non-blank id.
pub fn clone_base_product(
    source: &BaseProduct,
    opts: &CloneBaseProductOptions,
    now: DateTime<Utc>,
) -> DomainResult<BaseProduct> {
    let new_id: BaseProductId = clone_id(
        source.id.as_str(),
        opts.new_id.as_deref(),
        opts.suffix.as_deref(),
        now,
    )
    .parse()?;

    let defaults = if source.defaults.is_object() {
        source.defaults.clone()
    } else {
        serde_json::json!({})
    };

    Ok(BaseProduct {
        id: new_id,
        name: clone_name(&source.name, opts.new_name.as_deref()),
        defaults,
        audit: Audit::at(now),
        ..source.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_product() -> Product {
        Product {
            id: "P1".parse().unwrap(),
            base_product_id: Some("PB1".parse().unwrap()),
            overrides: json!({"config": {"pricing": {"basePrice": 25}}}),
            extensions: json!({}),
            product_definition: Some(json!({"Name": "Ceramic Mug", "ShortDescription": "11oz"})),
            capabilities: None,
            config: None,
            product_type: None,
            interaction_type: None,
            catalog_ids: vec!["CAT1".parse().unwrap(), "CAT2".parse().unwrap()],
            template_key: None,
            identity_records: vec![
                IdentityRecord::storefront("P1"),
                IdentityRecord {
                    system: "XMPie".to_string(),
                    id: "XMPie19484".to_string(),
                },
            ],
            status_id: Some(1),
            display_order: 4,
            audit: Audit::default(),
        }
    }

    #[test]
    fn clone_generates_suffixed_id_and_copy_name() {
        let now = Utc::now();
        let cloned = clone_product(&source_product(), &CloneProductOptions::default(), now).unwrap();

        assert_eq!(
            cloned.id.as_str(),
            format!("P1_COPY_{}", now.timestamp_millis())
        );
        assert_eq!(cloned.display_name(), Some("Ceramic Mug (Copy)"));
        // Untouched fields copied verbatim.
        assert_eq!(cloned.catalog_ids, source_product().catalog_ids);
        assert_eq!(cloned.overrides, source_product().overrides);
        assert_eq!(
            cloned.product_definition.unwrap()["ShortDescription"],
            json!("11oz")
        );
    }

    #[test]
    fn default_options_keep_source_catalog_memberships() {
        let opts = CloneProductOptions::default();
        assert!(opts.keep_catalog_ids);

        let cloned = clone_product(&source_product(), &opts, Utc::now()).unwrap();
        assert_eq!(cloned.catalog_ids, source_product().catalog_ids);
    }

    #[test]
    fn clone_honors_explicit_id_and_name() {
        let opts = CloneProductOptions {
            new_id: Some("P2".to_string()),
            new_name: Some("Other Mug".to_string()),
            ..CloneProductOptions::default()
        };
        let cloned = clone_product(&source_product(), &opts, Utc::now()).unwrap();
        assert_eq!(cloned.id.as_str(), "P2");
        assert_eq!(cloned.display_name(), Some("Other Mug"));
    }

    #[test]
    fn clone_rewrites_exactly_one_storefront_identity() {
        let opts = CloneProductOptions {
            new_id: Some("P2".to_string()),
            ..CloneProductOptions::default()
        };
        let cloned = clone_product(&source_product(), &opts, Utc::now()).unwrap();

        let storefront: Vec<_> = cloned
            .identity_records
            .iter()
            .filter(|r| r.is_storefront())
            .collect();
        assert_eq!(storefront.len(), 1);
        assert_eq!(storefront[0].id, "P2");
        assert_eq!(cloned.identity_records[0].id, "P2");
        assert!(cloned
            .identity_records
            .iter()
            .any(|r| r.system == "XMPie" && r.id == "XMPie19484"));
    }

    #[test]
    fn catalog_id_options_take_precedence_over_source() {
        let opts = CloneProductOptions {
            catalog_id: Some("CAT9".parse().unwrap()),
            ..CloneProductOptions::default()
        };
        let cloned = clone_product(&source_product(), &opts, Utc::now()).unwrap();
        assert_eq!(cloned.catalog_ids, vec!["CAT9".parse().unwrap()]);

        let opts = CloneProductOptions {
            catalog_id: Some("CAT9".parse().unwrap()),
            catalog_ids: Some(vec!["CAT7".parse().unwrap(), "CAT8".parse().unwrap()]),
            ..CloneProductOptions::default()
        };
        let cloned = clone_product(&source_product(), &opts, Utc::now()).unwrap();
        assert_eq!(
            cloned.catalog_ids,
            vec!["CAT7".parse().unwrap(), "CAT8".parse().unwrap()]
        );
    }

    #[test]
    fn clone_fails_when_no_catalog_membership_available() {
        let mut source = source_product();
        source.catalog_ids.clear();

        let err = clone_product(&source, &CloneProductOptions::default(), Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("catalogIds")),
            other => panic!("expected Validation, got {other:?}"),
        }

        let opts = CloneProductOptions {
            keep_catalog_ids: false,
            ..CloneProductOptions::default()
        };
        assert!(clone_product(&source_product(), &opts, Utc::now()).is_err());
    }

    #[test]
    fn clone_base_has_no_catalog_requirement() {
        let source = BaseProduct {
            id: "PB1".parse().unwrap(),
            name: "Mug base".to_string(),
            defaults: json!({"capabilities": {"purchasable": true}}),
            schema_hints: json!({"defaultTemplateKey": "generic"}),
            status_id: None,
            display_order: 0,
            audit: Audit::default(),
        };
        let now = Utc::now();
        let cloned = clone_base_product(&source, &CloneBaseProductOptions::default(), now).unwrap();

        assert_eq!(
            cloned.id.as_str(),
            format!("PB1_COPY_{}", now.timestamp_millis())
        );
        assert_eq!(cloned.name, "Mug base (Copy)");
        assert_eq!(cloned.defaults, source.defaults);
        assert_eq!(cloned.schema_hints, source.schema_hints);
        assert_eq!(cloned.audit.created_at, now);
    }

    #[test]
    fn clone_base_coerces_non_map_defaults() {
        let source = BaseProduct {
            id: "PB1".parse().unwrap(),
            name: "Broken".to_string(),
            defaults: json!("oops"),
            schema_hints: json!({}),
            status_id: None,
            display_order: 0,
            audit: Audit::default(),
        };
        let cloned =
            clone_base_product(&source, &CloneBaseProductOptions::default(), Utc::now()).unwrap();
        assert_eq!(cloned.defaults, json!({}));
    }

    #[test]
    fn custom_suffix_feeds_generated_id() {
        let now = Utc::now();
        let opts = CloneProductOptions {
            suffix: Some("STAGING".to_string()),
            ..CloneProductOptions::default()
        };
        let cloned = clone_product(&source_product(), &opts, now).unwrap();
        assert_eq!(
            cloned.id.as_str(),
            format!("P1_STAGING_{}", now.timestamp_millis())
        );
    }
}
