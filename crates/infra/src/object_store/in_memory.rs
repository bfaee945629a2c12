use std::collections::HashMap;
use std::sync::RwLock;

use super::r#trait::{ObjectStore, ObjectStoreError};

/// An object as written by `put_object`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory object store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let objects = self.objects.read().ok()?;
        objects.get(&(bucket.to_string(), key.to_string())).cloned()
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        if bucket.is_empty() || key.is_empty() {
            return Err(ObjectStoreError::Misconfigured(
                "bucket and key must not be empty".to_string(),
            ));
        }

        let mut objects = self
            .objects
            .write()
            .map_err(|_| ObjectStoreError::Unavailable("lock poisoned".to_string()))?;
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "in-memory"
    }
}
