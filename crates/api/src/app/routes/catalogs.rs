use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use storefront_core::{CatalogId, ProductId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

const SEARCH_LIMIT: usize = 25;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_catalog).get(list_catalogs))
        .route("/search", get(search_catalogs))
        .route("/:id", get(get_catalog).put(update_catalog).delete(delete_catalog))
        .route("/:id/products", get(catalog_products).post(add_placement))
        .route("/:id/products/:productId", delete(remove_placement))
}

pub async fn create_catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CatalogPayload>,
) -> axum::response::Response {
    let catalog = match body.into_new_catalog() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.create_catalog(catalog) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Children of `parentId`; the root level when no `parentId` is given.
pub async fn list_catalogs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::CatalogChildrenQuery>,
) -> axum::response::Response {
    let parent_id: Option<CatalogId> = match query
        .parent_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
    {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.list_catalog_children(parent_id.as_ref(), query.page()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn search_catalogs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::SearchQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(SEARCH_LIMIT).min(SEARCH_LIMIT);
    match services.search_catalog_paths(&query.q, limit) {
        Ok(hits) => (StatusCode::OK, Json(serde_json::json!({ "items": hits }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_catalog(&id) {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CatalogPayload>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let catalog = match body.into_updated_catalog(id) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.update_catalog(catalog) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_catalog(&id) {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// The catalog page payload: every member product, materialized and in the
/// deterministic three-level order.
pub async fn catalog_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog_products(&id) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_placement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PlacementRequest>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.add_placement(&id, &product_id) {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_placement(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: CatalogId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.remove_placement(&id, &product_id) {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
