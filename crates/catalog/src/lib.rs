//! `storefront-catalog`: the catalog hierarchy model.
//!
//! Catalogs form a rooted tree; each node optionally holds an ordered list of
//! product placements. [`tree`] normalizes fetched pages into an in-memory
//! store with idempotent merging and cycle-safe walks; [`catalog`] carries the
//! persisted node shape and the deterministic product ordering.

pub mod catalog;
pub mod tree;

pub use catalog::{sort_catalog_products, Catalog, ProductPlacement};
pub use tree::{ancestor_chain, would_create_cycle, CatalogNode, CatalogStore, Crumb, StoreEvent};
