use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_core::TemplateKey;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_template).get(list_templates))
        .route(
            "/:key",
            get(get_template).put(update_template).delete(delete_template),
        )
}

pub async fn create_template(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TemplatePayload>,
) -> axum::response::Response {
    let template = match body.into_new_template() {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.create_template(template) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_templates(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_templates() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_template(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let key: TemplateKey = match key.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_template(&key) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_template(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
    Json(body): Json<dto::TemplatePayload>,
) -> axum::response::Response {
    let key: TemplateKey = match key.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let template = match body.into_updated_template(key) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.update_template(template) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_template(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let key: TemplateKey = match key.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_template(&key) {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
