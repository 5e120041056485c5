//! `storefront-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error taxonomy, dotted-path access over JSON
//! documents, and the deterministic deep-merge used by product inheritance.

pub mod error;
pub mod fields;
pub mod id;
pub mod merge;
pub mod path;

pub use error::{DomainError, DomainResult};
pub use fields::ProductField;
pub use id::{BaseProductId, CatalogId, ProductId, TemplateKey};
pub use merge::deep_merge;
pub use path::{delete_path, get_path, has_path, set_path, DocPath};
