use thiserror::Error;

/// Object store operation error.
///
/// `Unavailable` and `Rejected` are backend failures a caller may report to
/// its own client. `Misconfigured` means the request itself could not be
/// built and points at a bug or bad configuration.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Rejected(String),

    #[error("object store misconfigured: {0}")]
    Misconfigured(String),
}

impl ObjectStoreError {
    /// Whether the failure came from the backend (network or service).
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Rejected(_))
    }
}

/// Blob storage addressed by bucket + key.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `bucket/key`, replacing any existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;

    fn store_type(&self) -> &'static str;
}
