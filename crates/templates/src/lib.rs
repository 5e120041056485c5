//! `storefront-templates`: page-rendering templates and their selection rule.
//!
//! A template is a named, reusable ordered list of render blocks. Selection
//! follows a fixed precedence (product-explicit, then base-hinted, then the
//! system default) and fails loudly when nothing matches: there is no safe
//! arbitrary layout to fall back to.

pub mod resolver;
pub mod template;

pub use resolver::{resolve_template, TemplateNotFound};
pub use template::{ProductTemplate, RenderBlock};
