//! # Core Backup
//!
//! Bucket-to-Drive migration: selects objects in a flat bucket, uploads a
//! filtered subset into the namespace-scoped versioner, and deletes the
//! selected originals from the bucket once every upload was attempted.
//! Supports a dry-run mode that only lists and counts.

pub mod coordinator;
pub mod error;

pub use coordinator::{
    parse_filepath, BackupConfig, BucketToDriveBackup, FilepathParts, ObjectFilter,
    DEFAULT_DISCRIMINATOR_REGEX,
};
pub use error::{BackupError, Result};
