use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use catalog_products::{Product, ProductKey, ProductQuery};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Items are kept ordered by `(category, name)`, so
/// query results come back sort-key ascending like a real partition read.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    items: RwLock<BTreeMap<ProductKey, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// Counts through a poisoned lock; the map itself stays consistent since
    /// every mutation is a single insert or remove.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn load(&self, key: &ProductKey) -> Result<Option<Product>, StoreError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    async fn put(&self, product: Product) -> Result<(), StoreError> {
        let key = product
            .key()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(key, product);
        Ok(())
    }

    async fn delete(&self, key: &ProductKey) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}
