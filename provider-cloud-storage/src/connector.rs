//! Cloud Storage API connector implementation
//!
//! Implements the `BucketStore` trait for the Cloud Storage JSON API,
//! scoped to a single bucket.

use async_trait::async_trait;
use bridge_traits::bucket::{BucketObject, BucketStore};
use bridge_traits::error::{Result, StoreError};
use bridge_traits::http::{HttpClient, HttpRequest};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::types::{ErrorResponse, ObjectsListResponse, StorageObject};

/// Cloud Storage JSON API base URL
const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1";

/// Maximum results per listing page
const LIST_PAGE_SIZE: u32 = 1000;

/// Fields to request for object resources
const OBJECT_FIELDS: &str = "name,size,contentType,updated";

/// Cloud Storage bucket connector
///
/// Implements `BucketStore` for one bucket of the Cloud Storage JSON API:
/// paginated listing, `alt=media` downloads written to a local path, and
/// object deletion.
pub struct CloudStorageConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token with `devstorage.read_write` scope
    access_token: String,

    /// Bucket every operation is scoped to
    bucket: String,
}

impl CloudStorageConnector {
    /// Create a new connector scoped to `bucket`
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String, bucket: String) -> Self {
        Self {
            http_client,
            access_token,
            bucket,
        }
    }

    /// Parse RFC 3339 timestamp to Unix timestamp
    fn parse_timestamp(rfc3339: &str) -> Option<i64> {
        DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).timestamp())
    }

    /// URL for one object, name percent-encoded as a single path segment
    fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            STORAGE_API_BASE,
            self.bucket,
            urlencoding::encode(object_name)
        )
    }

    /// Convert StorageObject to BucketObject
    fn convert_object(object: StorageObject) -> BucketObject {
        BucketObject {
            name: object.name,
            size: object.size.and_then(|s| s.parse().ok()),
            content_type: object.content_type,
            updated_at: object.updated.as_deref().and_then(Self::parse_timestamp),
        }
    }

    /// Execute a request and decode error responses
    async fn send(&self, request: HttpRequest) -> Result<bridge_traits::http::HttpResponse> {
        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(status = response.status, "Cloud Storage request succeeded");
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
                    "Cloud Storage request failed"
                );
                Err(StoreError::Api {
                    reason,
                    status,
                    message: envelope.error.message,
                })
            }
            Err(_) => {
                warn!(status = status, "Cloud Storage request failed without envelope");
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
impl BucketStore for CloudStorageConnector {
    #[instrument(skip(self))]
    async fn list_objects(&self) -> Result<Vec<BucketObject>> {
        info!(bucket = %self.bucket, "Listing bucket objects");

        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/b/{}/o?maxResults={}&fields=nextPageToken,items({})",
                STORAGE_API_BASE, self.bucket, LIST_PAGE_SIZE, OBJECT_FIELDS
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let request = HttpRequest::get(url)
                .bearer_token(&self.access_token)
                .header("Accept", "application/json")
                .timeout(Duration::from_secs(30));

            let response = self.send(request).await?;
            let page: ObjectsListResponse = response.json()?;

            objects.extend(page.items.into_iter().map(Self::convert_object));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(count = objects.len(), "Listed bucket objects");

        Ok(objects)
    }

    #[instrument(skip(self), fields(object_name = %object_name))]
    async fn download_to(&self, object_name: &str, destination: &Path) -> Result<()> {
        info!(destination = %destination.display(), "Downloading bucket object");

        let url = format!("{}?alt=media", self.object_url(object_name));

        let request = HttpRequest::get(url)
            .bearer_token(&self.access_token)
            .timeout(Duration::from_secs(300));

        let response = self.send(request).await?;
        tokio::fs::write(destination, &response.body).await?;

        debug!(bytes = response.body.len(), "Download written to disk");

        Ok(())
    }

    #[instrument(skip(self), fields(object_name = %object_name))]
    async fn delete(&self, object_name: &str) -> Result<()> {
        info!("Deleting bucket object");

        let request = HttpRequest::delete(self.object_url(object_name))
            .bearer_token(&self.access_token)
            .timeout(Duration::from_secs(30));

        self.send(request).await?;

        Ok(())
    }
}
