//! Reqwest-backed implementation of the `HttpClient` seam.

use async_trait::async_trait;
use bridge_traits::{
    error::{Result, StoreError},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pooled reqwest client with exponential-backoff retry of transient
/// failures.
///
/// Transport errors and retryable statuses (429, 5xx) are retried per the
/// policy. A retryable status that survives every attempt is returned as
/// the response it is, so the connector above can still decode the API's
/// error envelope; only requests that never produced a response become
/// [`StoreError::Network`].
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a client whose per-request default timeout is `timeout`;
    /// individual requests may still override it.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .user_agent(concat!("drive-versioner/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client configuration is static and valid");

        Self { client }
    }

    /// Wrap an externally configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// One attempt: send the request and buffer the response, whatever its
    /// status. Only transport-level failures become errors here.
    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Network("Request timed out".to_string())
    } else if error.is_connect() {
        StoreError::Network(format!("Connection failed: {}", error))
    } else {
        StoreError::Network(error.to_string())
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::default())
            .await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let attempts = policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            debug!(
                attempt,
                max_attempts = attempts,
                method = request.method.as_str(),
                url = %request.url,
                "Sending HTTP request"
            );

            let last_attempt = attempt == attempts;
            match self.send_once(&request).await {
                Ok(response) if response.is_retryable() && !last_attempt => {
                    warn!(
                        status = response.status,
                        attempt, "Retryable response status"
                    );
                }
                Ok(response) => return Ok(response),
                Err(error) if last_attempt => return Err(error),
                Err(error) => {
                    warn!(error = %error, attempt, "Transport failure, will retry");
                }
            }

            let delay = policy.delay_after(attempt);
            debug!(delay_ms = delay.as_millis(), "Backing off before retry");
            sleep(delay).await;
        }

        // The final iteration always returns above.
        Err(StoreError::Network("All retry attempts exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructs_with_defaults() {
        let _client = ReqwestHttpClient::new();
        let _also = ReqwestHttpClient::default();
    }
}
