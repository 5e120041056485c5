//! Inheritance resolution: base defaults + overrides + extensions -> resolved view.
//!
//! Resolution order, lowest to highest precedence:
//! 1. `base.defaults` (missing base resolves as an empty map),
//! 2. the legacy top-level `productDefinition`, but only while `overrides` is
//!    completely empty (pre-inheritance documents),
//! 3. `overrides`,
//! 4. `extensions`,
//! 5. the legacy compatibility overlay: `productDefinition`, `capabilities`
//!    and `config` overlay-merge on top, while `productType` and
//!    `interactionType` are first-write-wins (legacy fills them only when
//!    inheritance left them unset). The asymmetry between 5a and 5b is
//!    preserved deliberately for compatibility with existing documents.
//!
//! Everything here is pure and total: malformed-but-structurally-valid
//! documents degrade to "absent", they never error.

use serde::Serialize;
use serde_json::{json, Map, Value};

use storefront_core::{
    deep_merge, delete_path, get_path, has_path, set_path, BaseProductId, DocPath, ProductId,
    TemplateKey,
};

use crate::product::{BaseProduct, IdentityRecord, Product};

/// The materialized view of a product. A value object, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProduct {
    pub id: ProductId,
    pub base_product_id: Option<BaseProductId>,
    pub template_key: Option<TemplateKey>,
    pub identity_records: Vec<IdentityRecord>,
    pub status_id: Option<i64>,
    pub display_order: i64,
    /// The single canonical document the storefront renders from.
    pub document: Value,
    /// True when `base_product_id` is set but the base no longer resolves.
    /// Non-fatal: resolution proceeded with empty defaults, callers surface
    /// this as a visible warning.
    pub base_missing: bool,
}

/// Materialize `product` against its (optionally missing) base.
pub fn resolve(product: &Product, base: Option<&BaseProduct>) -> ResolvedProduct {
    let empty = Value::Object(Map::new());
    let defaults = base.map_or(&empty, |b| &b.defaults);

    // Documents created before inheritance existed carry their definition as
    // a legacy top-level field; treat it as an implicit override only while
    // the overrides document is still untouched.
    let implicit_legacy = if product.has_empty_overrides() {
        product
            .product_definition
            .as_ref()
            .filter(|pd| pd.is_object())
            .map(|pd| json!({ "ProductDefinition": pd }))
    } else {
        None
    };

    let mut document = deep_merge(&[
        defaults,
        implicit_legacy.as_ref().unwrap_or(&empty),
        &product.overrides,
        &product.extensions,
    ]);

    // deep_merge always yields a map.
    if let Some(map) = document.as_object_mut() {
        overlay_legacy(map, "ProductDefinition", product.product_definition.as_ref());
        overlay_legacy(map, "capabilities", product.capabilities.as_ref());
        overlay_legacy(map, "config", product.config.as_ref());
        fill_legacy_scalar(map, "productType", product.product_type.as_deref());
        fill_legacy_scalar(map, "interactionType", product.interaction_type.as_deref());
    }

    ResolvedProduct {
        id: product.id.clone(),
        base_product_id: product.base_product_id.clone(),
        template_key: product.template_key.clone(),
        identity_records: product.identity_records.clone(),
        status_id: product.status_id,
        display_order: product.display_order,
        document,
        base_missing: product.base_product_id.is_some() && base.is_none(),
    }
}

/// Legacy maps overlay-merge onto the inherited value, legacy winning where
/// both define a key.
fn overlay_legacy(map: &mut Map<String, Value>, key: &str, legacy: Option<&Value>) {
    let Some(legacy) = legacy.filter(|v| v.is_object()) else {
        return;
    };
    let merged = deep_merge(&[map.get(key).unwrap_or(&Value::Null), legacy]);
    map.insert(key.to_string(), merged);
}

/// Legacy scalars are first-write-wins: they fill the slot only when the
/// inherited resolution left it unset (or null).
fn fill_legacy_scalar(map: &mut Map<String, Value>, key: &str, legacy: Option<&str>) {
    let Some(legacy) = legacy.filter(|s| !s.trim().is_empty()) else {
        return;
    };
    if map.get(key).is_none_or(Value::is_null) {
        map.insert(key.to_string(), Value::String(legacy.to_string()));
    }
}

/// Which layer supplied the resolved value at `path`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    Override,
    Extension,
    Base,
    Legacy,
    Absent,
}

/// Provenance for one field of the resolved document, mirroring the layering
/// in [`resolve`]. The override/revert editor uses this to label fields as
/// inherited vs. explicitly set.
pub fn field_origin(product: &Product, base: Option<&BaseProduct>, path: &DocPath) -> FieldOrigin {
    let Some(head) = path.segments().first().map(String::as_str) else {
        return FieldOrigin::Absent;
    };

    if matches!(head, "ProductDefinition" | "capabilities" | "config")
        && legacy_doc_has(product, path)
    {
        return FieldOrigin::Legacy;
    }
    if has_path(&product.extensions, path) {
        return FieldOrigin::Extension;
    }
    if has_path(&product.overrides, path) {
        return FieldOrigin::Override;
    }
    if product.has_empty_overrides() && legacy_doc_has(product, path) {
        return FieldOrigin::Legacy;
    }
    if base.is_some_and(|b| has_path(&b.defaults, path)) {
        return FieldOrigin::Base;
    }
    if path.segments().len() == 1 {
        let legacy_scalar = match head {
            "productType" => product.product_type.as_deref(),
            "interactionType" => product.interaction_type.as_deref(),
            _ => None,
        };
        if legacy_scalar.is_some_and(|s| !s.trim().is_empty()) {
            return FieldOrigin::Legacy;
        }
    }
    FieldOrigin::Absent
}

fn legacy_doc_has(product: &Product, path: &DocPath) -> bool {
    let Some((head, rest)) = path.segments().split_first() else {
        return false;
    };
    let doc = match head.as_str() {
        "ProductDefinition" => product.product_definition.as_ref(),
        "capabilities" => product.capabilities.as_ref(),
        "config" => product.config.as_ref(),
        _ => None,
    };
    let Some(doc) = doc.filter(|d| d.is_object()) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    match DocPath::new(rest.iter().cloned()) {
        Ok(rest) => has_path(doc, &rest),
        Err(_) => false,
    }
}

/// True when the product explicitly sets `path`, regardless of value.
pub fn is_overridden(overrides: &Value, path: &DocPath) -> bool {
    has_path(overrides, path)
}

/// Snapshot the currently resolved value at `path` into the overrides, so the
/// editable value does not visibly change at the instant of "Override".
pub fn begin_override(overrides: &Value, resolved_doc: &Value, path: &DocPath) -> Value {
    let current = get_path(resolved_doc, path).cloned().unwrap_or(Value::Null);
    set_path(overrides, path, current)
}

/// Drop the explicit override; the next resolve falls back to the inherited
/// value.
pub fn revert(overrides: &Value, path: &DocPath) -> Value {
    delete_path(overrides, path)
}

/// Write a new value at an already-overridden path. Writing to a path that is
/// not overridden is a no-op: callers must `begin_override` first, which is
/// what keeps every override visible in the document.
pub fn change_override(overrides: &Value, path: &DocPath, value: Value) -> Value {
    if !has_path(overrides, path) {
        return overrides.clone();
    }
    set_path(overrides, path, value)
}
