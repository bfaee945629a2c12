use axum::Router;

pub mod products;
pub mod system;

/// Router for all product endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/product", products::router())
}
