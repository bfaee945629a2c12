//! AWS S3 object store implementation.

use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use super::r#trait::{ObjectStore, ObjectStoreError};
use crate::aws::{SdkFailure, classify_sdk_error};

/// S3 object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from shared SDK config.
    ///
    /// `force_path_style` is needed by most S3-compatible local endpoints.
    pub fn new(config: &SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(config)
            .force_path_style(force_path_style)
            .build();
        Self {
            client: Client::from_conf(s3_config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| match classify_sdk_error(e) {
                SdkFailure::Construction(msg) => ObjectStoreError::Misconfigured(msg),
                SdkFailure::Service(msg) => ObjectStoreError::Rejected(msg),
                SdkFailure::Transport(msg) => ObjectStoreError::Unavailable(msg),
            })?;
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "s3"
    }
}
