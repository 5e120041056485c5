//! `storefront-infra`: the persistence collaborator contract.
//!
//! The core never talks to a database directly; it consumes the repository
//! traits in [`repository`]. [`in_memory`] provides `RwLock`-guarded
//! implementations used by tests, development, and the default API wiring.

pub mod in_memory;
pub mod repository;

pub use in_memory::{
    InMemoryBaseProductStore, InMemoryCatalogStore, InMemoryProductStore, InMemoryTemplateStore,
};
pub use repository::{
    BaseProductRepository, CatalogRepository, Page, ProductRepository, TemplateRepository,
};
