use std::sync::Arc;

use thiserror::Error;

use catalog_core::DomainError;
use catalog_infra::config::{Backend, Settings, UploadSettings};
use catalog_infra::document_store::{InMemoryProductStore, ProductStore, StoreError};
use catalog_infra::object_store::{InMemoryObjectStore, ObjectStore, ObjectStoreError};
use catalog_products::{Product, ProductKey, ProductQuery};

/// Content type of the fixed-text upload.
pub const UPLOAD_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stateless product operations over a document store and an object store.
///
/// Each call issues exactly one backend request (a paged query counts as
/// one logical request) and holds no state between calls.
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    objects: Arc<dyn ObjectStore>,
    upload: UploadSettings,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("store", &self.store.backend())
            .field("objects", &self.objects.store_type())
            .field("upload", &self.upload)
            .finish()
    }
}

impl ProductService {
    pub fn new(
        store: Arc<dyn ProductStore>,
        objects: Arc<dyn ObjectStore>,
        upload: UploadSettings,
    ) -> Self {
        Self {
            store,
            objects,
            upload,
        }
    }

    /// Load one product; `Ok(None)` when the key is absent.
    pub async fn get(&self, category: &str, name: &str) -> Result<Option<Product>, ServiceError> {
        let key = ProductKey::new(category, name)?;
        let product = self.store.load(&key).await?;
        tracing::debug!(%key, found = product.is_some(), "product loaded");
        Ok(product)
    }

    /// Upsert: replaces any record with the same `(category, name)`.
    pub async fn save(&self, product: Product) -> Result<(), ServiceError> {
        let key = product.key()?;
        self.store.put(product).await?;
        tracing::info!(%key, "product saved");
        Ok(())
    }

    /// Delete by key; deleting an absent key succeeds.
    pub async fn delete(&self, category: &str, name: &str) -> Result<(), ServiceError> {
        let key = ProductKey::new(category, name)?;
        self.store.delete(&key).await?;
        tracing::info!(%key, "product deleted");
        Ok(())
    }

    /// Search one category, optionally narrowed by exact name and maximum price.
    ///
    /// The narrowing conditions are filters over the whole partition, so the
    /// cost of a search grows with the size of the category regardless of how
    /// selective the filters are.
    pub async fn search(
        &self,
        category: &str,
        name: Option<&str>,
        price: Option<f64>,
    ) -> Result<Vec<Product>, ServiceError> {
        let query = ProductQuery::new(category, name, price)?;
        let products = self.store.query(&query).await?;
        tracing::debug!(
            category,
            filters = query.conditions().len(),
            returned = products.len(),
            "product search"
        );
        Ok(products)
    }

    /// Upload the configured text body to the configured bucket/key.
    pub async fn upload_fixed_text(&self) -> Result<(), ObjectStoreError> {
        let UploadSettings { bucket, key, body } = &self.upload;
        self.objects
            .put_object(bucket, key, body.as_bytes().to_vec(), UPLOAD_CONTENT_TYPE)
            .await?;
        tracing::info!(bucket = %bucket, key = %key, bytes = body.len(), "text uploaded");
        Ok(())
    }

    pub fn upload_settings(&self) -> &UploadSettings {
        &self.upload
    }
}

/// Wire the service against the backends selected by `settings`.
pub async fn build_services(settings: &Settings) -> ProductService {
    match settings.backend {
        Backend::Aws => {
            #[cfg(feature = "aws")]
            {
                return build_aws_services(settings).await;
            }
            #[cfg(not(feature = "aws"))]
            {
                tracing::warn!(
                    "USE_AWS_BACKENDS=true but aws feature not enabled, falling back to in-memory"
                );
            }
        }
        Backend::InMemory => {}
    }

    build_in_memory_services(settings.upload.clone())
}

/// In-memory wiring (dev/test).
pub fn build_in_memory_services(upload: UploadSettings) -> ProductService {
    tracing::info!("using in-memory document and object stores");
    ProductService::new(
        Arc::new(InMemoryProductStore::new()),
        Arc::new(InMemoryObjectStore::new()),
        upload,
    )
}

#[cfg(feature = "aws")]
async fn build_aws_services(settings: &Settings) -> ProductService {
    use catalog_infra::document_store::DynamoDbProductStore;
    use catalog_infra::object_store::S3ObjectStore;

    let sdk_config = catalog_infra::aws::load_sdk_config(&settings.aws).await;
    tracing::info!(
        region = %settings.aws.region,
        table = %settings.aws.table_name,
        bucket = %settings.upload.bucket,
        "using DynamoDB and S3 backends"
    );

    ProductService::new(
        Arc::new(DynamoDbProductStore::new(&sdk_config, settings.aws.table_name.clone())),
        Arc::new(S3ObjectStore::new(&sdk_config, settings.aws.endpoint_url.is_some())),
        settings.upload.clone(),
    )
}
