use std::collections::HashMap;
use std::sync::RwLock;

use storefront_catalog::Catalog;
use storefront_core::{BaseProductId, CatalogId, DomainError, DomainResult, ProductId, TemplateKey};
use storefront_products::{BaseProduct, Product};
use storefront_templates::ProductTemplate;

use super::repository::{
    BaseProductRepository, CatalogRepository, Page, ProductRepository, TemplateRepository,
};

fn lock_poisoned() -> DomainError {
    DomainError::conflict("store lock poisoned")
}

fn page_slice<T>(mut items: Vec<T>, page: Page) -> Vec<T> {
    let offset = page.offset();
    if offset >= items.len() {
        return Vec::new();
    }
    items.drain(..offset);
    items.truncate(page.page_size as usize);
    items
}

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductStore {
    fn find_by_id(&self, id: &ProductId) -> DomainResult<Option<Product>> {
        let products = self.products.read().map_err(|_| lock_poisoned())?;
        Ok(products.get(id).cloned())
    }

    fn list(&self, page: Page) -> DomainResult<Vec<Product>> {
        let products = self.products.read().map_err(|_| lock_poisoned())?;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(page_slice(all, page))
    }

    fn find_by_catalog(&self, catalog_id: &CatalogId) -> DomainResult<Vec<Product>> {
        let products = self.products.read().map_err(|_| lock_poisoned())?;
        Ok(products
            .values()
            .filter(|p| p.catalog_ids.contains(catalog_id))
            .cloned()
            .collect())
    }

    fn insert(&self, product: Product) -> DomainResult<Product> {
        let mut products = self.products.write().map_err(|_| lock_poisoned())?;
        if products.contains_key(&product.id) {
            return Err(DomainError::conflict(format!(
                "product '{}' already exists",
                product.id
            )));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    fn update(&self, product: Product) -> DomainResult<Product> {
        let mut products = self.products.write().map_err(|_| lock_poisoned())?;
        if !products.contains_key(&product.id) {
            return Err(DomainError::NotFound);
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    fn delete(&self, id: &ProductId) -> DomainResult<Product> {
        let mut products = self.products.write().map_err(|_| lock_poisoned())?;
        products.remove(id).ok_or(DomainError::NotFound)
    }
}

/// In-memory base-product store.
#[derive(Debug, Default)]
pub struct InMemoryBaseProductStore {
    bases: RwLock<HashMap<BaseProductId, BaseProduct>>,
}

impl InMemoryBaseProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BaseProductRepository for InMemoryBaseProductStore {
    fn find_by_id(&self, id: &BaseProductId) -> DomainResult<Option<BaseProduct>> {
        let bases = self.bases.read().map_err(|_| lock_poisoned())?;
        Ok(bases.get(id).cloned())
    }

    fn list(&self, page: Page) -> DomainResult<Vec<BaseProduct>> {
        let bases = self.bases.read().map_err(|_| lock_poisoned())?;
        let mut all: Vec<BaseProduct> = bases.values().cloned().collect();
        all.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(page_slice(all, page))
    }

    fn insert(&self, base: BaseProduct) -> DomainResult<BaseProduct> {
        let mut bases = self.bases.write().map_err(|_| lock_poisoned())?;
        if bases.contains_key(&base.id) {
            return Err(DomainError::conflict(format!(
                "base product '{}' already exists",
                base.id
            )));
        }
        bases.insert(base.id.clone(), base.clone());
        Ok(base)
    }

    fn update(&self, base: BaseProduct) -> DomainResult<BaseProduct> {
        let mut bases = self.bases.write().map_err(|_| lock_poisoned())?;
        if !bases.contains_key(&base.id) {
            return Err(DomainError::NotFound);
        }
        bases.insert(base.id.clone(), base.clone());
        Ok(base)
    }

    fn delete(&self, id: &BaseProductId) -> DomainResult<BaseProduct> {
        let mut bases = self.bases.write().map_err(|_| lock_poisoned())?;
        bases.remove(id).ok_or(DomainError::NotFound)
    }
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    catalogs: RwLock<HashMap<CatalogId, Catalog>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sort_siblings(siblings: &mut [Catalog]) {
        siblings.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
    }
}

impl CatalogRepository for InMemoryCatalogStore {
    fn find_by_id(&self, id: &CatalogId) -> DomainResult<Option<Catalog>> {
        let catalogs = self.catalogs.read().map_err(|_| lock_poisoned())?;
        Ok(catalogs.get(id).cloned())
    }

    fn find_by_parent(
        &self,
        parent_id: Option<&CatalogId>,
        page: Page,
    ) -> DomainResult<Vec<Catalog>> {
        let catalogs = self.catalogs.read().map_err(|_| lock_poisoned())?;
        let mut siblings: Vec<Catalog> = catalogs
            .values()
            .filter(|c| c.parent_id.as_ref() == parent_id)
            .cloned()
            .collect();
        Self::sort_siblings(&mut siblings);
        Ok(page_slice(siblings, page))
    }

    fn search_by_name(&self, query: &str, limit: usize) -> DomainResult<Vec<Catalog>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let catalogs = self.catalogs.read().map_err(|_| lock_poisoned())?;
        let mut matches: Vec<Catalog> = catalogs
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Self::sort_siblings(&mut matches);
        matches.truncate(limit);
        Ok(matches)
    }

    fn insert(&self, catalog: Catalog) -> DomainResult<Catalog> {
        let mut catalogs = self.catalogs.write().map_err(|_| lock_poisoned())?;
        if catalogs.contains_key(&catalog.id) {
            return Err(DomainError::conflict(format!(
                "catalog '{}' already exists",
                catalog.id
            )));
        }
        catalogs.insert(catalog.id.clone(), catalog.clone());
        Ok(catalog)
    }

    fn update(&self, catalog: Catalog) -> DomainResult<Catalog> {
        let mut catalogs = self.catalogs.write().map_err(|_| lock_poisoned())?;
        if !catalogs.contains_key(&catalog.id) {
            return Err(DomainError::NotFound);
        }
        catalogs.insert(catalog.id.clone(), catalog.clone());
        Ok(catalog)
    }

    fn delete(&self, id: &CatalogId) -> DomainResult<Catalog> {
        let mut catalogs = self.catalogs.write().map_err(|_| lock_poisoned())?;
        catalogs.remove(id).ok_or(DomainError::NotFound)
    }
}

/// In-memory template store.
///
/// Holds the single-default invariant under its write lock: saving a default
/// clears the prior default in the same critical section, and deleting the
/// default promotes the first remaining template by key.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<TemplateKey, ProductTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_default(templates: &mut HashMap<TemplateKey, ProductTemplate>, except: &TemplateKey) {
        for (key, template) in templates.iter_mut() {
            if key != except {
                template.is_default = false;
            }
        }
    }
}

impl TemplateRepository for InMemoryTemplateStore {
    fn find_by_key(&self, key: &TemplateKey) -> DomainResult<Option<ProductTemplate>> {
        let templates = self.templates.read().map_err(|_| lock_poisoned())?;
        Ok(templates.get(key).cloned())
    }

    fn find_default(&self) -> DomainResult<Option<ProductTemplate>> {
        let templates = self.templates.read().map_err(|_| lock_poisoned())?;
        Ok(templates.values().find(|t| t.is_default).cloned())
    }

    fn list(&self) -> DomainResult<Vec<ProductTemplate>> {
        let templates = self.templates.read().map_err(|_| lock_poisoned())?;
        let mut all: Vec<ProductTemplate> = templates.values().cloned().collect();
        all.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.key.as_str().cmp(b.key.as_str()))
        });
        Ok(all)
    }

    fn insert(&self, template: ProductTemplate) -> DomainResult<ProductTemplate> {
        let mut templates = self.templates.write().map_err(|_| lock_poisoned())?;
        if templates.contains_key(&template.key) {
            return Err(DomainError::conflict(format!(
                "template '{}' already exists",
                template.key
            )));
        }
        if template.is_default {
            Self::clear_default(&mut templates, &template.key);
        }
        templates.insert(template.key.clone(), template.clone());
        Ok(template)
    }

    fn update(&self, template: ProductTemplate) -> DomainResult<ProductTemplate> {
        let mut templates = self.templates.write().map_err(|_| lock_poisoned())?;
        if !templates.contains_key(&template.key) {
            return Err(DomainError::NotFound);
        }
        if template.is_default {
            Self::clear_default(&mut templates, &template.key);
        }
        templates.insert(template.key.clone(), template.clone());
        Ok(template)
    }

    fn delete(&self, key: &TemplateKey) -> DomainResult<ProductTemplate> {
        let mut templates = self.templates.write().map_err(|_| lock_poisoned())?;
        let removed = templates.remove(key).ok_or(DomainError::NotFound)?;
        if removed.is_default {
            let next = templates
                .keys()
                .min_by(|a, b| a.as_str().cmp(b.as_str()))
                .cloned();
            if let Some(next_key) = next {
                if let Some(next_template) = templates.get_mut(&next_key) {
                    next_template.is_default = true;
                }
            }
        }
        Ok(removed)
    }
}
