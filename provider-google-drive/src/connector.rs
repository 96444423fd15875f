//! Google Drive API connector implementation
//!
//! Implements the `DriveStore` trait for Google Drive API v3 (files and
//! revisions resources, multipart uploads).

use async_trait::async_trait;
use bridge_traits::error::{Result, StoreError};
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::store::{DriveStore, ObjectMetadata, RemoteObject, Revision};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::types::{
    DriveFile, DriveRevision, ErrorResponse, FileMetadata, FilesListResponse, RevisionListResponse,
    RevisionPatch,
};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Google Drive upload endpoint base URL
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Fields to request for file resources
const FILE_FIELDS: &str = "id,name,mimeType,parents,properties,originalFilename,trashed";

/// Fields to request for revision resources
const REVISION_FIELDS: &str = "id,originalFilename,keepForever,modifiedTime";

/// Page size for name-scoped queries; exact-name matches stay tiny
const QUERY_PAGE_SIZE: u32 = 100;

/// Page size for revision listings (Drive API maximum)
const REVISION_PAGE_SIZE: u32 = 1000;

/// Boundary for multipart/related upload bodies
const MULTIPART_BOUNDARY: &str = "gdv_multipart_boundary";

/// Google Drive API connector
///
/// Implements `DriveStore` for Google Drive API v3.
///
/// # Features
///
/// - Parent/name/mimeType-scoped metadata queries excluding trashed items
/// - Metadata-only creation (folders) via the standard endpoint
/// - Multipart create/update uploading content and metadata in one request,
///   with `keepRevisionForever` passed as the request parameter Drive
///   defines for it
/// - Revision listing and single-field retention patches
/// - Structured error envelopes decoded into `StoreError::Api`
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::DriveConnector;
/// use bridge_traits::store::DriveStore;
///
/// let connector = DriveConnector::new(http_client, access_token);
/// let matches = connector.query(root_id, "postgresBackups", Some(MIME_FOLDER)).await?;
/// ```
pub struct DriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token with `drive` scope
    access_token: String,
}

impl DriveConnector {
    /// Create a new Google Drive connector
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
        }
    }

    /// Parse RFC 3339 timestamp to Unix timestamp
    fn parse_timestamp(rfc3339: &str) -> Option<i64> {
        DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).timestamp())
    }

    /// Escape a value for embedding in a Drive query string
    ///
    /// See: https://developers.google.com/drive/api/guides/search-files
    fn escape_query(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }

    /// Convert DriveFile to RemoteObject
    fn convert_file(drive_file: DriveFile) -> RemoteObject {
        RemoteObject {
            id: drive_file.id,
            name: drive_file.name,
            mime_type: drive_file.mime_type,
            parents: drive_file.parents,
            properties: drive_file.properties,
            original_filename: drive_file.original_filename,
            trashed: drive_file.trashed,
        }
    }

    /// Convert DriveRevision to Revision
    fn convert_revision(revision: DriveRevision) -> Revision {
        Revision {
            id: revision.id,
            original_filename: revision.original_filename,
            keep_forever: revision.keep_forever,
            modified_at: revision
                .modified_time
                .as_deref()
                .and_then(Self::parse_timestamp),
        }
    }

    /// Strip the transport-level flag off write-side metadata
    ///
    /// `keepRevisionForever` is a request parameter, not a metadata field,
    /// so it never enters the serialized body.
    fn convert_metadata(metadata: &ObjectMetadata) -> FileMetadata {
        FileMetadata {
            name: metadata.name.clone(),
            mime_type: metadata.mime_type.clone(),
            original_filename: metadata.original_filename.clone(),
            parents: metadata.parents.clone(),
            properties: metadata.properties.clone(),
        }
    }

    /// Build a multipart/related body: JSON metadata part + media part
    ///
    /// See: https://developers.google.com/drive/api/guides/manage-uploads#multipart
    fn build_multipart_body(metadata: &FileMetadata, content: &Bytes) -> Result<Bytes> {
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| StoreError::Parse(format!("Failed to serialize file metadata: {}", e)))?;
        let content_type = metadata
            .mime_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let mut body = Vec::with_capacity(content.len() + metadata_json.len() + 256);
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, metadata_json
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("--{}\r\nContent-Type: {}\r\n\r\n", MULTIPART_BOUNDARY, content_type).as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--", MULTIPART_BOUNDARY).as_bytes());

        Ok(Bytes::from(body))
    }

    /// Execute a request and decode error responses
    ///
    /// Non-2xx answers carrying Google's structured envelope become
    /// `StoreError::Api` with the first error's reason code; anything the
    /// envelope parser cannot read keeps the raw body as the message.
    async fn send(&self, request: HttpRequest) -> Result<bridge_traits::http::HttpResponse> {
        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(status = response.status, "Drive API request succeeded");
            return Ok(response);
        }

        let status = response.status;
        match response.json::<ErrorResponse>() {
            Ok(envelope) => {
                let reason = envelope
                    .error
                    .errors
                    .first()
                    .and_then(|detail| detail.reason.clone());
                warn!(
                    status = status,
                    reason = reason.as_deref().unwrap_or("<none>"),
                    "Drive API request failed"
                );
                Err(StoreError::Api {
                    reason,
                    status,
                    message: envelope.error.message,
                })
            }
            Err(_) => {
                warn!(status = status, "Drive API request failed without envelope");
                Err(StoreError::Api {
                    reason: None,
                    status,
                    message: String::from_utf8_lossy(&response.body).to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl DriveStore for DriveConnector {
    #[instrument(skip(self), fields(parent_id = %parent_id, name = %name))]
    async fn query(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: Option<String>,
    ) -> Result<Vec<RemoteObject>> {
        let mut query = format!(
            "'{}' in parents and trashed = false and name = '{}'",
            Self::escape_query(parent_id),
            Self::escape_query(name)
        );
        if let Some(mime) = &mime_type {
            query.push_str(&format!(" and mimeType = '{}'", Self::escape_query(mime)));
        }

        let url = format!(
            "{}/files?q={}&pageSize={}&fields=nextPageToken,files({})",
            DRIVE_API_BASE,
            urlencoding::encode(&query),
            QUERY_PAGE_SIZE,
            FILE_FIELDS
        );

        let request = HttpRequest::get(url)
            .bearer_token(&self.access_token)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        let response = self.send(request).await?;
        let list: FilesListResponse = response.json()?;

        debug!(matches = list.files.len(), "Drive query completed");

        Ok(list.files.into_iter().map(Self::convert_file).collect())
    }

    #[instrument(skip(self, metadata, content))]
    async fn create(
        &self,
        metadata: ObjectMetadata,
        content: Option<Bytes>,
    ) -> Result<RemoteObject> {
        let payload = Self::convert_metadata(&metadata);

        let request = match content {
            Some(bytes) => {
                let url = format!(
                    "{}/files?uploadType=multipart&keepRevisionForever={}&fields={}",
                    UPLOAD_API_BASE, metadata.keep_revision_forever, FILE_FIELDS
                );
                HttpRequest::post(url)
                    .bearer_token(&self.access_token)
                    .header(
                        "Content-Type",
                        format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
                    )
                    .body(Self::build_multipart_body(&payload, &bytes)?)
                    .timeout(Duration::from_secs(120))
            }
            None => {
                let url = format!("{}/files?fields={}", DRIVE_API_BASE, FILE_FIELDS);
                HttpRequest::post(url)
                    .bearer_token(&self.access_token)
                    .json(&payload)?
                    .timeout(Duration::from_secs(30))
            }
        };

        let response = self.send(request).await?;
        let file: DriveFile = response.json()?;

        Ok(Self::convert_file(file))
    }

    #[instrument(skip(self, metadata, content), fields(file_id = %file_id))]
    async fn update(
        &self,
        file_id: &str,
        metadata: ObjectMetadata,
        content: Option<Bytes>,
    ) -> Result<RemoteObject> {
        let payload = Self::convert_metadata(&metadata);

        let request = match content {
            Some(bytes) => {
                let url = format!(
                    "{}/files/{}?uploadType=multipart&keepRevisionForever={}&fields={}",
                    UPLOAD_API_BASE, file_id, metadata.keep_revision_forever, FILE_FIELDS
                );
                HttpRequest::patch(url)
                    .bearer_token(&self.access_token)
                    .header(
                        "Content-Type",
                        format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
                    )
                    .body(Self::build_multipart_body(&payload, &bytes)?)
                    .timeout(Duration::from_secs(120))
            }
            None => {
                let url = format!("{}/files/{}?fields={}", DRIVE_API_BASE, file_id, FILE_FIELDS);
                HttpRequest::patch(url)
                    .bearer_token(&self.access_token)
                    .json(&payload)?
                    .timeout(Duration::from_secs(30))
            }
        };

        let response = self.send(request).await?;
        let file: DriveFile = response.json()?;

        Ok(Self::convert_file(file))
    }

    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn list_revisions(&self, file_id: &str) -> Result<Vec<Revision>> {
        let url = format!(
            "{}/files/{}/revisions?pageSize={}&fields=revisions({})",
            DRIVE_API_BASE, file_id, REVISION_PAGE_SIZE, REVISION_FIELDS
        );

        let request = HttpRequest::get(url)
            .bearer_token(&self.access_token)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        let response = self.send(request).await?;
        let list: RevisionListResponse = response.json()?;

        debug!(revisions = list.revisions.len(), "Revision listing completed");

        Ok(list
            .revisions
            .into_iter()
            .map(Self::convert_revision)
            .collect())
    }

    #[instrument(skip(self), fields(file_id = %file_id, revision_id = %revision_id))]
    async fn update_revision(
        &self,
        file_id: &str,
        revision_id: &str,
        keep_forever: bool,
    ) -> Result<Revision> {
        let url = format!(
            "{}/files/{}/revisions/{}?fields={}",
            DRIVE_API_BASE, file_id, revision_id, REVISION_FIELDS
        );

        let request = HttpRequest::patch(url)
            .bearer_token(&self.access_token)
            .json(&RevisionPatch { keep_forever })?
            .timeout(Duration::from_secs(30));

        let response = self.send(request).await?;
        let revision: DriveRevision = response.json()?;

        Ok(Self::convert_revision(revision))
    }
}
