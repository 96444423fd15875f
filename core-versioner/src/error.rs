use std::path::PathBuf;

use bridge_traits::error::StoreError;
use thiserror::Error;

/// Versioner error taxonomy
///
/// Classified remote failures carry the original status code and message.
/// Unstructured store failures pass through unchanged via the transparent
/// `Store` variant; nothing is ever swallowed.
#[derive(Error, Debug)]
pub enum VersionerError {
    /// Local precondition failure; never retried automatically.
    #[error("The file to version is not readable: {path}")]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More than one directory answers the namespace query. The remote
    /// state is ambiguous and needs manual cleanup.
    #[error("Found multiple directories for namespace {ns}; manual cleanup required")]
    DuplicateDirectory { ns: String },

    /// More than one versioned file inside the namespace directory.
    #[error("Found multiple versioned files for namespace {ns}; manual cleanup required")]
    DuplicateVersioned { ns: String },

    /// Listing was requested but the namespace directory or the versioned
    /// file does not exist.
    #[error("Cannot list versions for namespace {ns}: missing directory or versioned file")]
    CannotList { ns: String },

    /// Remote ACLs reject the operation; retryable only after fixing them.
    #[error("Authorisation incorrect (status {status}): {message}")]
    Authorization { status: u16, message: String },

    /// The parent object exists but is not a folder.
    #[error("Parent is not a folder (status {status}): {message}")]
    ParentNotFolder { status: u16, message: String },

    /// The store rejected a metadata field as read-only.
    #[error("Metadata field not writable (status {status}): {message}")]
    FieldNotWritable { status: u16, message: String },

    /// The configured root directory id does not resolve.
    #[error("Unable to locate the root directory {root_id} (status {status})")]
    RootNotFound { root_id: String, status: u16 },

    /// A structured remote error whose reason code has no typed mapping
    /// yet. Carries the raw diagnostic and propagates normally.
    #[error("Unclassified remote error (reason {reason}, status {status}): {message}")]
    UnknownRemote {
        reason: String,
        status: u16,
        message: String,
    },

    /// Unstructured store failure, re-surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, VersionerError>;
