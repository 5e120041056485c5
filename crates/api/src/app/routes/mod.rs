use axum::Router;

pub mod bases;
pub mod catalogs;
pub mod products;
pub mod storefront;
pub mod system;
pub mod templates;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/bases", bases::router())
        .nest("/catalogs", catalogs::router())
        .nest("/templates", templates::router())
        .nest("/storefront", storefront::router())
}
