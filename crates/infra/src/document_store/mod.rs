//! Document store boundary for product records.
//!
//! Records live in a managed key-value/document store keyed by
//! `(category, name)`. This module defines the capability set the service
//! needs (load, put, delete, query) without assuming a particular backend.

pub mod in_memory;
pub mod r#trait;

#[cfg(feature = "aws")]
pub mod dynamodb;

pub use in_memory::InMemoryProductStore;
pub use r#trait::{ProductStore, StoreError};

#[cfg(feature = "aws")]
pub use dynamodb::DynamoDbProductStore;
