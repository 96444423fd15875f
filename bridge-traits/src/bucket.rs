//! Flat Object Store Abstraction
//!
//! The contract the bucket migration consumes: list everything, download an
//! object to a local path, delete an object. Modeled on the Cloud Storage
//! JSON API's objects resource.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// An object in a flat bucket namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketObject {
    /// Full object name, which may contain `/` separators
    pub name: String,
    /// Size in bytes, when reported
    pub size: Option<u64>,
    /// Content type, when reported
    pub content_type: Option<String>,
    /// Last update as Unix seconds, when reported
    pub updated_at: Option<i64>,
}

impl BucketObject {
    /// The final path segment of the object name.
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Flat object store scoped to a single bucket.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// List every object in the bucket.
    async fn list_objects(&self) -> Result<Vec<BucketObject>>;

    /// Download an object's content to `destination`, overwriting it.
    async fn download_to(&self, object_name: &str, destination: &Path) -> Result<()>;

    /// Delete an object from the bucket.
    async fn delete(&self, object_name: &str) -> Result<()>;
}
