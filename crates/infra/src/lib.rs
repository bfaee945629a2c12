//! Infrastructure layer: document store, object store, config, AWS clients.

pub mod config;
pub mod document_store;
pub mod object_store;

#[cfg(feature = "aws")]
pub mod aws;
