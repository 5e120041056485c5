//! Template selection by fixed precedence.

use thiserror::Error;

use storefront_core::TemplateKey;

use crate::template::ProductTemplate;

/// No template matched any precedence level. Fatal for rendering a
/// storefront product page; silently picking "the first template in the
/// list" used to make storefront output unpredictable, so the outcome is
/// explicit instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no product template could be resolved")]
pub struct TemplateNotFound;

/// Select the page-rendering template. First match wins:
/// 1. the product's explicit `template_key`,
/// 2. the base's `schemaHints.defaultTemplateKey`,
/// 3. the single `is_default` template.
///
/// Each level falls through when its key is unset or names no known template.
/// Pure over already-fetched inputs; fetching is the collaborator's concern.
pub fn resolve_template<'a>(
    explicit: Option<&TemplateKey>,
    base_hint: Option<&TemplateKey>,
    available: &'a [ProductTemplate],
) -> Result<&'a ProductTemplate, TemplateNotFound> {
    let by_key = |key: &TemplateKey| available.iter().find(|t| &t.key == key);

    explicit
        .and_then(by_key)
        .or_else(|| base_hint.and_then(by_key))
        .or_else(|| available.iter().find(|t| t.is_default))
        .ok_or(TemplateNotFound)
}
