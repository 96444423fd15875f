//! # Core Versioner
//!
//! Idempotent, cached, namespace-scoped versioning of local files against a
//! hierarchical remote store.
//!
//! ## Overview
//!
//! [`Versioner`](versioner::Versioner) keeps one directory per namespace
//! under a configured root and a single `versioned` container inside it;
//! every uploaded file becomes a pinned revision of that container, tagged
//! with a caller-supplied discriminator. Repeat uploads of the same
//! filename are logged no-ops. See the module docs of
//! [`versioner`] for the dedup and race caveats.

mod cache;
pub mod error;
pub mod messages;
mod mime;
pub mod versioner;

pub use error::{Result, VersionerError};
pub use versioner::{
    Mode, Versioner, Versioning, VERBOSITY_ALL, VERBOSITY_NOTICE, VERBOSITY_SILENT,
    VERSIONED_FILENAME,
};
