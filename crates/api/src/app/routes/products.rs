use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_core::ProductId;
use storefront_products::CloneProductOptions;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/clone", post(clone_product))
        .route("/:id/resolved", get(resolved_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProductPayload>,
) -> axum::response::Response {
    let product = match body.into_new_product() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.create_product(product) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.list_products(query.page()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_product(&id) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductPayload>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product = match body.into_updated_product(id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.update_product(product) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_product(&id) {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clone_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(opts): Json<CloneProductOptions>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.clone_product(&id, &opts) {
        Ok(cloned) => (StatusCode::CREATED, Json(cloned)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Admin-facing materialized view: the same resolution the storefront uses,
/// without the template requirement.
pub async fn resolved_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.materialize(&id) {
        Ok(resolved) => (StatusCode::OK, Json(resolved)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
