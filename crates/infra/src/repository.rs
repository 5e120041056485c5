//! Repository traits the core consumes.
//!
//! Implementations return the stored document or a typed not-found/conflict
//! signal; they never invent defaults. Insert is exists-then-insert: it is
//! not atomic across processes, and a racing create surfaces as a
//! `Conflict` from whichever side loses. The core never retries or mutates
//! the requested id.

use storefront_core::{BaseProductId, CatalogId, DomainResult, ProductId, TemplateKey};
use storefront_catalog::Catalog;
use storefront_products::{BaseProduct, Product};
use storefront_templates::ProductTemplate;

/// Clamped pagination: page >= 1, 1 <= page_size <= 200.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub const MAX_PAGE_SIZE: u32 = 200;

    pub fn clamped(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        // Widened before multiplying; u32::MAX * 200 does not fit in u32.
        (self.page as usize - 1) * self.page_size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::clamped(1, 10)
    }
}

pub trait ProductRepository: Send + Sync {
    fn find_by_id(&self, id: &ProductId) -> DomainResult<Option<Product>>;
    /// Page of products, sorted by display name then id.
    fn list(&self, page: Page) -> DomainResult<Vec<Product>>;
    /// Every product whose `catalog_ids` contains `catalog_id`, unsorted.
    fn find_by_catalog(&self, catalog_id: &CatalogId) -> DomainResult<Vec<Product>>;
    fn insert(&self, product: Product) -> DomainResult<Product>;
    fn update(&self, product: Product) -> DomainResult<Product>;
    fn delete(&self, id: &ProductId) -> DomainResult<Product>;
}

pub trait BaseProductRepository: Send + Sync {
    fn find_by_id(&self, id: &BaseProductId) -> DomainResult<Option<BaseProduct>>;
    fn list(&self, page: Page) -> DomainResult<Vec<BaseProduct>>;
    fn insert(&self, base: BaseProduct) -> DomainResult<BaseProduct>;
    fn update(&self, base: BaseProduct) -> DomainResult<BaseProduct>;
    fn delete(&self, id: &BaseProductId) -> DomainResult<BaseProduct>;
}

pub trait CatalogRepository: Send + Sync {
    fn find_by_id(&self, id: &CatalogId) -> DomainResult<Option<Catalog>>;
    /// Children of `parent_id` (`None` = roots), sorted by display order then
    /// name then id.
    fn find_by_parent(&self, parent_id: Option<&CatalogId>, page: Page) -> DomainResult<Vec<Catalog>>;
    /// Case-insensitive name substring match.
    fn search_by_name(&self, query: &str, limit: usize) -> DomainResult<Vec<Catalog>>;
    fn insert(&self, catalog: Catalog) -> DomainResult<Catalog>;
    fn update(&self, catalog: Catalog) -> DomainResult<Catalog>;
    fn delete(&self, id: &CatalogId) -> DomainResult<Catalog>;
}

pub trait TemplateRepository: Send + Sync {
    fn find_by_key(&self, key: &TemplateKey) -> DomainResult<Option<ProductTemplate>>;
    fn find_default(&self) -> DomainResult<Option<ProductTemplate>>;
    /// All templates, default first, then by name.
    fn list(&self) -> DomainResult<Vec<ProductTemplate>>;
    /// Insert; when `is_default` is set, atomically clears the prior default.
    fn insert(&self, template: ProductTemplate) -> DomainResult<ProductTemplate>;
    fn update(&self, template: ProductTemplate) -> DomainResult<ProductTemplate>;
    /// Delete; when the default is deleted, the first remaining template (by
    /// key) is promoted so the storefront keeps a fallback.
    fn delete(&self, key: &TemplateKey) -> DomainResult<ProductTemplate>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_to_sane_bounds() {
        assert_eq!(Page::clamped(0, 0), Page { page: 1, page_size: 1 });
        assert_eq!(Page::clamped(3, 50), Page { page: 3, page_size: 50 });
        assert_eq!(Page::clamped(1, 9999).page_size, Page::MAX_PAGE_SIZE);
    }

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(Page::clamped(1, 10).offset(), 0);
        assert_eq!(Page::clamped(3, 10).offset(), 20);
    }

    #[test]
    fn page_offset_survives_extreme_page_numbers() {
        let offset = Page::clamped(u32::MAX, Page::MAX_PAGE_SIZE).offset();
        assert_eq!(offset, (u32::MAX as usize - 1) * Page::MAX_PAGE_SIZE as usize);
    }
}
