//! Object storage: byte fetch by bucket and key.

pub mod http;

use async_trait::async_trait;

use crate::error::{AnswerError, Result};

pub use http::HttpObjectStore;

/// Read access to an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// A `scheme://bucket/object-path` location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUri {
    pub bucket: String,
    pub key: String,
}

impl StorageUri {
    /// Split a storage URI into bucket and object key.
    ///
    /// Everything after the first `//` is split on the first `/`; a URI
    /// without a path yields an empty key.
    pub fn parse(uri: &str) -> Result<Self> {
        let (_, rest) = uri
            .split_once("//")
            .ok_or_else(|| AnswerError::InvalidUri(uri.to_string()))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(AnswerError::InvalidUri(uri.to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}
