use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use storefront_catalog::{
    ancestor_chain, sort_catalog_products, would_create_cycle, Catalog,
};
use storefront_core::{BaseProductId, CatalogId, DomainError, DomainResult, ProductId, TemplateKey};
use storefront_infra::{
    BaseProductRepository, CatalogRepository, InMemoryBaseProductStore, InMemoryCatalogStore,
    InMemoryProductStore, InMemoryTemplateStore, Page, ProductRepository, TemplateRepository,
};
use storefront_products::{
    clone_base_product, clone_product, resolve, BaseProduct, CloneBaseProductOptions,
    CloneProductOptions, Product, ResolvedProduct,
};
use storefront_templates::{resolve_template, ProductTemplate};

/// Payload of `GET /storefront/products/:id`: everything a product page
/// render needs in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontView {
    pub product: ResolvedProduct,
    pub template: ProductTemplate,
}

/// One hit of the catalog path search: the matching catalog plus its
/// root-first ancestor path (the hit itself included, last).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPathHit {
    pub catalog: Catalog,
    pub path: Vec<Catalog>,
}

/// Application services: repositories plus the orchestration that spans them.
pub struct AppServices {
    pub products: Arc<dyn ProductRepository>,
    pub bases: Arc<dyn BaseProductRepository>,
    pub catalogs: Arc<dyn CatalogRepository>,
    pub templates: Arc<dyn TemplateRepository>,
}

/// Default wiring: in-memory stores.
pub fn build_services() -> AppServices {
    AppServices {
        products: Arc::new(InMemoryProductStore::new()),
        bases: Arc::new(InMemoryBaseProductStore::new()),
        catalogs: Arc::new(InMemoryCatalogStore::new()),
        templates: Arc::new(InMemoryTemplateStore::new()),
    }
}

impl AppServices {
    // ---- products ----

    pub fn create_product(&self, product: Product) -> DomainResult<Product> {
        product.validate()?;
        self.products.insert(product)
    }

    pub fn get_product(&self, id: &ProductId) -> DomainResult<Product> {
        self.products.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_products(&self, page: Page) -> DomainResult<Vec<Product>> {
        self.products.list(page)
    }

    /// Full replace; the id comes from the URL and is immutable, creation
    /// stamps survive.
    pub fn update_product(&self, mut product: Product) -> DomainResult<Product> {
        let existing = self.get_product(&product.id)?;
        product.audit = existing.audit.touched(Utc::now());
        product.validate()?;
        self.products.update(product)
    }

    pub fn delete_product(&self, id: &ProductId) -> DomainResult<Product> {
        self.products.delete(id)
    }

    pub fn clone_product(&self, id: &ProductId, opts: &CloneProductOptions) -> DomainResult<Product> {
        let source = self.get_product(id)?;
        let cloned = clone_product(&source, opts, Utc::now())?;
        cloned.validate()?;
        self.products.insert(cloned)
    }

    /// Materialize one product against its base.
    ///
    /// A dangling `base_product_id` is an integrity warning, not an error:
    /// resolution proceeds with empty defaults and the output is flagged.
    pub fn materialize(&self, id: &ProductId) -> DomainResult<ResolvedProduct> {
        let product = self.get_product(id)?;
        let base = self.fetch_base(&product)?;
        Ok(resolve(&product, base.as_ref()))
    }

    fn fetch_base(&self, product: &Product) -> DomainResult<Option<BaseProduct>> {
        let Some(base_id) = &product.base_product_id else {
            return Ok(None);
        };
        let base = self.bases.find_by_id(base_id)?;
        if base.is_none() {
            tracing::warn!(
                product_id = %product.id,
                base_product_id = %base_id,
                "base product missing; resolving with empty defaults"
            );
        }
        Ok(base)
    }

    // ---- base products ----

    pub fn create_base(&self, base: BaseProduct) -> DomainResult<BaseProduct> {
        base.validate()?;
        self.bases.insert(base)
    }

    pub fn get_base(&self, id: &BaseProductId) -> DomainResult<BaseProduct> {
        self.bases.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_bases(&self, page: Page) -> DomainResult<Vec<BaseProduct>> {
        self.bases.list(page)
    }

    pub fn update_base(&self, mut base: BaseProduct) -> DomainResult<BaseProduct> {
        let existing = self.get_base(&base.id)?;
        base.audit = existing.audit.touched(Utc::now());
        base.validate()?;
        self.bases.update(base)
    }

    /// Deleting a base is legal while products still reference it; their
    /// next materialization degrades to empty defaults with a warning.
    pub fn delete_base(&self, id: &BaseProductId) -> DomainResult<BaseProduct> {
        self.bases.delete(id)
    }

    pub fn clone_base(
        &self,
        id: &BaseProductId,
        opts: &CloneBaseProductOptions,
    ) -> DomainResult<BaseProduct> {
        let source = self.get_base(id)?;
        let cloned = clone_base_product(&source, opts, Utc::now())?;
        cloned.validate()?;
        self.bases.insert(cloned)
    }

    // ---- catalogs ----

    pub fn create_catalog(&self, catalog: Catalog) -> DomainResult<Catalog> {
        catalog.validate()?;
        self.check_parent(&catalog)?;
        self.catalogs.insert(catalog)
    }

    pub fn get_catalog(&self, id: &CatalogId) -> DomainResult<Catalog> {
        self.catalogs.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_catalog_children(
        &self,
        parent_id: Option<&CatalogId>,
        page: Page,
    ) -> DomainResult<Vec<Catalog>> {
        self.catalogs.find_by_parent(parent_id, page)
    }

    pub fn update_catalog(&self, mut catalog: Catalog) -> DomainResult<Catalog> {
        let existing = self.get_catalog(&catalog.id)?;
        catalog.validate()?;
        self.check_parent(&catalog)?;
        catalog.audit = existing.audit.touched(Utc::now());
        self.catalogs.update(catalog)
    }

    pub fn delete_catalog(&self, id: &CatalogId) -> DomainResult<Catalog> {
        self.catalogs.delete(id)
    }

    fn check_parent(&self, catalog: &Catalog) -> DomainResult<()> {
        if let Some(parent_id) = &catalog.parent_id {
            if self.catalogs.find_by_id(parent_id)?.is_none() {
                return Err(DomainError::validation(format!(
                    "parent catalog '{parent_id}' does not exist"
                )));
            }
        }
        let fetch = |cid: &CatalogId| self.catalogs.find_by_id(cid).ok().flatten();
        if would_create_cycle(&catalog.id, catalog.parent_id.as_ref(), fetch) {
            return Err(DomainError::validation(format!(
                "assigning parent '{:?}' to catalog '{}' would create a cycle",
                catalog.parent_id, catalog.id
            )));
        }
        Ok(())
    }

    /// Name substring search; every hit carries its root-first path so the
    /// admin UI can jump straight to the right branch of the tree.
    pub fn search_catalog_paths(&self, query: &str, limit: usize) -> DomainResult<Vec<CatalogPathHit>> {
        let hits = self.catalogs.search_by_name(query, limit)?;
        let fetch = |cid: &CatalogId| self.catalogs.find_by_id(cid).ok().flatten();
        Ok(hits
            .into_iter()
            .map(|catalog| {
                let path = ancestor_chain(&catalog.id, fetch);
                CatalogPathHit { catalog, path }
            })
            .collect())
    }

    /// Materialized members of one catalog, in the deterministic page order.
    pub fn catalog_products(&self, id: &CatalogId) -> DomainResult<Vec<ResolvedProduct>> {
        let catalog = self.get_catalog(id)?;
        let members = self.products.find_by_catalog(id)?;

        let mut resolved = Vec::with_capacity(members.len());
        for product in &members {
            let base = self.fetch_base(product)?;
            resolved.push(resolve(product, base.as_ref()));
        }
        Ok(sort_catalog_products(&catalog.products, resolved))
    }

    pub fn add_placement(&self, catalog_id: &CatalogId, product_id: &ProductId) -> DomainResult<Catalog> {
        let catalog = self.get_catalog(catalog_id)?;
        let product = self.get_product(product_id)?;
        self.catalogs
            .update(catalog.with_product_added(product.id))
    }

    pub fn remove_placement(&self, catalog_id: &CatalogId, product_id: &ProductId) -> DomainResult<Catalog> {
        let catalog = self.get_catalog(catalog_id)?;
        self.catalogs
            .update(catalog.with_product_removed(product_id))
    }

    // ---- templates ----

    pub fn create_template(&self, template: ProductTemplate) -> DomainResult<ProductTemplate> {
        template.validate()?;
        self.templates.insert(template)
    }

    pub fn get_template(&self, key: &TemplateKey) -> DomainResult<ProductTemplate> {
        self.templates.find_by_key(key)?.ok_or(DomainError::NotFound)
    }

    pub fn list_templates(&self) -> DomainResult<Vec<ProductTemplate>> {
        self.templates.list()
    }

    pub fn update_template(&self, template: ProductTemplate) -> DomainResult<ProductTemplate> {
        template.validate()?;
        self.templates.update(template)
    }

    pub fn delete_template(&self, key: &TemplateKey) -> DomainResult<ProductTemplate> {
        self.templates.delete(key)
    }

    // ---- storefront ----

    /// Resolved document plus the template to render it with. Unknown
    /// product and unresolvable template are both `NotFound`; an
    /// unresolvable template on a live page has nothing safe to fall back
    /// to.
    pub fn storefront_product(&self, id: &ProductId) -> DomainResult<StorefrontView> {
        let product = self.get_product(id)?;
        let base = self.fetch_base(&product)?;
        let resolved = resolve(&product, base.as_ref());

        let base_hint = base.as_ref().and_then(BaseProduct::default_template_key);
        let available = self.templates.list()?;
        let template = resolve_template(product.template_key.as_ref(), base_hint.as_ref(), &available)
            .map_err(|e| {
                tracing::warn!(product_id = %product.id, "{e}");
                DomainError::NotFound
            })?
            .clone();

        Ok(StorefrontView {
            product: resolved,
            template,
        })
    }
}
