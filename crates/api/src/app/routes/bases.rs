use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_core::BaseProductId;
use storefront_products::CloneBaseProductOptions;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_base).get(list_bases))
        .route("/:id", get(get_base).put(update_base).delete(delete_base))
        .route("/:id/clone", post(clone_base))
}

pub async fn create_base(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BaseProductPayload>,
) -> axum::response::Response {
    let base = match body.into_new_base() {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.create_base(base) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_bases(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.list_bases(query.page()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_base(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BaseProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_base(&id) {
        Ok(base) => (StatusCode::OK, Json(base)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_base(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::BaseProductPayload>,
) -> axum::response::Response {
    let id: BaseProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let base = match body.into_updated_base(id) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.update_base(base) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_base(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BaseProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_base(&id) {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clone_base(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(opts): Json<CloneBaseProductOptions>,
) -> axum::response::Response {
    let id: BaseProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.clone_base(&id, &opts) {
        Ok(cloned) => (StatusCode::CREATED, Json(cloned)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
