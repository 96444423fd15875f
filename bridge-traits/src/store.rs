//! Hierarchical Object Store Abstraction
//!
//! The contract the versioning core consumes: a remote store with
//! folder-scoped metadata queries, create/update of objects with content,
//! and a per-object revision history whose entries carry a retention flag.
//! Modeled on the Drive v3 Files and Revisions APIs.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::error::Result;

/// MIME type the store uses to mark folder objects.
pub const MIME_FOLDER: &str = "application/vnd.google-apps.folder";

/// An object living in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Store-assigned id
    pub id: String,
    /// Object name (not unique; queries are name + parent scoped)
    pub name: String,
    /// MIME type, when the store reports one
    pub mime_type: Option<String>,
    /// Parent folder ids
    pub parents: Vec<String>,
    /// Free-form key/value properties attached to the object
    pub properties: HashMap<String, String>,
    /// Filename of the most recently uploaded content
    pub original_filename: Option<String>,
    /// Whether the object sits in the store's trash
    pub trashed: bool,
}

impl RemoteObject {
    /// Whether the object is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(MIME_FOLDER)
    }
}

/// Write-side metadata for `create`/`update` calls.
///
/// Fields left at their defaults are omitted from the request, so an update
/// only touches what the caller set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub original_filename: Option<String>,
    pub parents: Vec<String>,
    pub properties: HashMap<String, String>,
    /// Ask the store to pin the revision created by this write.
    pub keep_revision_forever: bool,
}

impl ObjectMetadata {
    /// Metadata for a folder with the given name under a parent.
    pub fn folder(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            mime_type: Some(MIME_FOLDER.to_string()),
            parents: vec![parent_id.into()],
            ..Self::default()
        }
    }
}

/// One entry in an object's revision history.
///
/// Revisions are returned oldest first, as the store orders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Store-assigned revision id
    pub id: String,
    /// Filename the revision's content was uploaded under
    pub original_filename: Option<String>,
    /// Retention flag; the store garbage-collects unpinned revisions
    pub keep_forever: bool,
    /// Modification time as Unix seconds, when reported
    pub modified_at: Option<i64>,
}

/// Hierarchical, revisioned object store.
///
/// All operations are single sequential round trips; none of them is
/// atomic with respect to each other, so get-or-create sequences built on
/// `query` + `create` are inherently racy (see the versioning core's docs).
#[async_trait]
pub trait DriveStore: Send + Sync {
    /// Query direct children of `parent_id` by exact name, optionally
    /// narrowed to a MIME type. Trashed objects are always excluded.
    /// Zero, one, or many results are all valid answers.
    async fn query(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: Option<String>,
    ) -> Result<Vec<RemoteObject>>;

    /// Create an object. With `content`, the bytes become the initial
    /// revision; without, a metadata-only object (e.g. a folder) is created.
    async fn create(&self, metadata: ObjectMetadata, content: Option<Bytes>)
        -> Result<RemoteObject>;

    /// Update an existing object's metadata and, when `content` is given,
    /// upload the bytes as a new head revision.
    async fn update(
        &self,
        file_id: &str,
        metadata: ObjectMetadata,
        content: Option<Bytes>,
    ) -> Result<RemoteObject>;

    /// List the full revision history of an object, oldest first.
    async fn list_revisions(&self, file_id: &str) -> Result<Vec<Revision>>;

    /// Set a single revision's retention flag. The request carries only the
    /// flag; no other revision field may be touched.
    async fn update_revision(
        &self,
        file_id: &str,
        revision_id: &str,
        keep_forever: bool,
    ) -> Result<Revision>;
}
