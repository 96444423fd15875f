//! Google Drive API response and request types
//!
//! Data structures for (de)serializing Google Drive API v3 payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Google Drive API file resource
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,

    /// File name
    pub name: String,

    /// MIME type
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Parent folder IDs
    #[serde(default)]
    pub parents: Vec<String>,

    /// Custom key/value properties visible to the app
    #[serde(default)]
    pub properties: HashMap<String, String>,

    /// Filename of the uploaded content (binary files only)
    #[serde(default)]
    pub original_filename: Option<String>,

    /// Whether the file is trashed
    #[serde(default)]
    pub trashed: bool,
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    /// List of files
    #[serde(default)]
    pub files: Vec<DriveFile>,

    /// Token for next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Write-side file metadata for files.create / files.update
///
/// Fields that were not set are omitted from the request body so an update
/// only touches what the caller provided.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

/// Google Drive API revision resource
///
/// See: https://developers.google.com/drive/api/v3/reference/revisions#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveRevision {
    /// Revision ID
    pub id: String,

    /// Filename of the content uploaded in this revision
    #[serde(default)]
    pub original_filename: Option<String>,

    /// Whether the revision is pinned against garbage collection
    #[serde(default)]
    pub keep_forever: bool,

    /// Modification time (RFC 3339)
    #[serde(default)]
    pub modified_time: Option<String>,
}

/// Google Drive API revisions.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/revisions/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionListResponse {
    /// Revisions, oldest first
    #[serde(default)]
    pub revisions: Vec<DriveRevision>,
}

/// Revision patch carrying only the retention flag
///
/// revisions.update replaces exactly the fields present in the body, so the
/// payload must never grow beyond `keepForever`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionPatch {
    pub keep_forever: bool,
}

/// Structured error envelope Google APIs wrap failures in
///
/// See: https://developers.google.com/drive/api/guides/handle-errors
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,

    #[serde(default)]
    pub code: u16,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub domain: Option<String>,
}
