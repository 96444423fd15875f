//! # Store Bridge Traits
//!
//! Abstraction seams between the versioning core and the remote services it
//! drives.
//!
//! ## Overview
//!
//! This crate defines the contracts the core crates are written against.
//! Each trait is a capability with at least two implementations: the real
//! API connector and a test double.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP with retry of transient failures
//! - [`DriveStore`](store::DriveStore) - hierarchical, revisioned object store (Drive Files/Revisions)
//! - [`BucketStore`](bucket::BucketStore) - flat object store (Cloud Storage objects)
//! - [`OutputSink`](output::OutputSink) - the operator-facing line protocol
//!
//! ## Error Handling
//!
//! Everything here speaks [`StoreError`](error::StoreError). Structured API
//! failures keep their `(reason, status, message)` triple so the versioning
//! core can classify them; transport failures stay opaque and are never
//! swallowed.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so implementations can be shared as
//! `Arc<dyn Trait>` across async tasks.

pub mod bucket;
pub mod error;
pub mod http;
pub mod output;
pub mod store;

pub use error::StoreError;

// Re-export commonly used types
pub use bucket::{BucketObject, BucketStore};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use output::{BufferedOutput, ConsoleOutput, OutputSink};
pub use store::{DriveStore, ObjectMetadata, RemoteObject, Revision, MIME_FOLDER};
