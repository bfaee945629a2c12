//! Object store boundary (bucket/key blobs).

pub mod in_memory;
pub mod r#trait;

#[cfg(feature = "aws")]
pub mod s3;

pub use in_memory::{InMemoryObjectStore, StoredObject};
pub use r#trait::{ObjectStore, ObjectStoreError};

#[cfg(feature = "aws")]
pub use s3::S3ObjectStore;
