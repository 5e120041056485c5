use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storefront_core::{DomainError, DomainResult, TemplateKey};

fn empty_map() -> Value {
    Value::Object(Map::new())
}

/// One render block of a template: the renderer contract is nothing more than
/// an ordered block list with per-block props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderBlock {
    pub id: String,
    /// Block kind understood by the renderer ("ProductTitle", "PricePanel",
    /// "HtmlCssSection", ...). Opaque to the core.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "empty_map")]
    pub props: Value,
}

/// A named, reusable page layout.
///
/// Invariant (repository-enforced): at most one template carries
/// `is_default = true` system-wide; setting a new default atomically clears
/// the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTemplate {
    pub key: TemplateKey,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<RenderBlock>,
    #[serde(default)]
    pub is_default: bool,
}

impl ProductTemplate {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("template name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_round_trips_with_type_key() {
        let block = RenderBlock {
            id: "b1".to_string(),
            kind: "ProductTitle".to_string(),
            props: json!({"align": "left"}),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], json!("ProductTitle"));
        let back: RenderBlock = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let template = ProductTemplate {
            key: "generic".parse().unwrap(),
            name: " ".to_string(),
            blocks: vec![],
            is_default: false,
        };
        assert!(template.validate().is_err());
    }
}
