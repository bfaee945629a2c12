use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use catalog_core::{DomainError, DomainResult};

/// Attribute name of the partition key.
pub const CATEGORY_ATTRIBUTE: &str = "category";
/// Attribute name of the sort key.
pub const NAME_ATTRIBUTE: &str = "name";
/// Attribute name of the price.
pub const PRICE_ATTRIBUTE: &str = "price";

/// Composite key `(category, name)` identifying exactly one product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    category: String,
    name: String,
}

impl ProductKey {
    /// Build a key; both components must be non-empty.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> DomainResult<Self> {
        let category = category.into();
        let name = name.into();

        if category.is_empty() {
            return Err(DomainError::validation("category must not be empty"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        Ok(Self { category, name })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl core::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// A product record as stored in the document store.
///
/// `category` is the partition key, `name` the sort key. Any other top-level
/// members are carried through `attributes` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl Product {
    pub fn new(category: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            price,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an extra attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Composite key of this record; fails if either component is empty.
    pub fn key(&self) -> DomainResult<ProductKey> {
        ProductKey::new(self.category.clone(), self.name.clone())
    }
}
