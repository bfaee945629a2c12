use serde::Deserialize;

/// Body of a successful `savebucket` call.
pub const UPLOAD_OK_MESSAGE: &str = "Text file successfully uploaded to S3.";

// -------------------------
// Request DTOs
// -------------------------

/// Optional filters of `GET /api/product/search/{category}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub product_name: Option<String>,
    pub price: Option<f64>,
}
