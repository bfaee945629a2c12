use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use catalog_infra::object_store::ObjectStoreError;
use catalog_products::Product;

use crate::app::services::ProductService;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/get/:category/:product_name", get(get_product))
        .route("/save", post(save_product))
        .route("/delete/:category/:product_name", delete(delete_product))
        .route("/search/:category", get(search_products))
        .route("/savebucket", post(save_bucket))
}

/// A missing product is a normal outcome: 200 with an empty body.
pub async fn get_product(
    Extension(services): Extension<Arc<ProductService>>,
    Path((category, product_name)): Path<(String, String)>,
) -> axum::response::Response {
    match services.get(&category, &product_name).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn save_product(
    Extension(services): Extension<Arc<ProductService>>,
    Json(body): Json<Product>,
) -> axum::response::Response {
    match services.save(body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<ProductService>>,
    Path((category, product_name)): Path<(String, String)>,
) -> axum::response::Response {
    match services.delete(&category, &product_name).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<ProductService>>,
    Path(category): Path<String>,
    Query(params): Query<dto::SearchParams>,
) -> axum::response::Response {
    match services
        .search(&category, params.product_name.as_deref(), params.price)
        .await
    {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Backend failures are reported to the caller as `Error: <message>`; a
/// request that could not even be built is logged and answered generically.
pub async fn save_bucket(
    Extension(services): Extension<Arc<ProductService>>,
) -> axum::response::Response {
    match services.upload_fixed_text().await {
        Ok(()) => (StatusCode::OK, dto::UPLOAD_OK_MESSAGE).into_response(),
        Err(e @ (ObjectStoreError::Unavailable(_) | ObjectStoreError::Rejected(_))) => {
            tracing::warn!(error = %e, "fixed-text upload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")).into_response()
        }
        Err(e @ ObjectStoreError::Misconfigured(_)) => {
            tracing::error!(error = %e, "fixed-text upload could not be issued");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}
