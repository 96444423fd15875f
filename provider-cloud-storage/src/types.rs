//! Cloud Storage JSON API response types
//!
//! Data structures for deserializing Cloud Storage JSON API responses.

use serde::Deserialize;

/// Cloud Storage object resource
///
/// See: https://cloud.google.com/storage/docs/json_api/v1/objects#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObject {
    /// Object name (may contain `/` separators)
    pub name: String,

    /// Size in bytes; the API reports it as a decimal string
    #[serde(default)]
    pub size: Option<String>,

    /// Content type
    #[serde(default)]
    pub content_type: Option<String>,

    /// Last update time (RFC 3339)
    #[serde(default)]
    pub updated: Option<String>,
}

/// Cloud Storage objects.list response
///
/// See: https://cloud.google.com/storage/docs/json_api/v1/objects/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectsListResponse {
    /// Objects in this page
    #[serde(default)]
    pub items: Vec<StorageObject>,

    /// Token for the next page, absent on the last one
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Structured error envelope, shared shape across Google APIs
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
}
