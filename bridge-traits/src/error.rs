use thiserror::Error;

/// Errors surfaced by the remote store backends and the HTTP layer beneath
/// them.
///
/// Google's APIs attach a machine-readable `reason` code to the first entry
/// of their error envelope; when a backend can decode that envelope it must
/// surface the failure as [`StoreError::Api`] so callers can classify on the
/// reason. Everything else (transport failures, undecodable bodies) is
/// opaque and must be propagated unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The remote API answered with an error payload.
    #[error("Remote API error (status {status}): {message}")]
    Api {
        /// Per-error reason code (e.g. `insufficientFilePermissions`),
        /// when the response carried one.
        reason: Option<String>,
        status: u16,
        message: String,
    },

    /// Transport-level failure: connect, TLS, timeout, retries exhausted.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Local filesystem failure while staging a download.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// The structured reason code, if the backend provided one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            StoreError::Api { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status, when the failure came from an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
