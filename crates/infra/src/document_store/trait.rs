use thiserror::Error;

use catalog_products::{Product, ProductKey, ProductQuery};

/// Document store operation error.
///
/// These are **infrastructure errors**, as opposed to domain errors
/// (validation).
///
/// ## Error Categories
///
/// - **Unavailable**: the request never got a usable answer (dispatch, timeout, broken response)
/// - **Rejected**: the store answered with a service error (throttling, missing table, bad value)
/// - **Malformed**: a stored item could not be decoded into a `Product`
/// - **Misconfigured**: the request could not be built (client/config bug)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store rejected request: {0}")]
    Rejected(String),

    #[error("malformed item: {0}")]
    Malformed(String),

    #[error("document store misconfigured: {0}")]
    Misconfigured(String),
}

/// Product records keyed by `(category, name)`.
///
/// ## Semantics
///
/// - `load()` returns `Ok(None)` for an absent key; absence is not an error.
/// - `put()` is a full replace of any record sharing the same key.
/// - `delete()` on an absent key succeeds.
/// - `query()` restricts by partition key, applies the query's filter
///   conditions to every item of the partition and returns the complete
///   result set (all pages) in store order.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn load(&self, key: &ProductKey) -> Result<Option<Product>, StoreError>;

    async fn put(&self, product: Product) -> Result<(), StoreError>;

    async fn delete(&self, key: &ProductKey) -> Result<(), StoreError>;

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
