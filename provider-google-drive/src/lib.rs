//! # Google Drive Provider
//!
//! Implements the `DriveStore` trait for Google Drive API v3.
//!
//! ## Overview
//!
//! This crate provides:
//! - Parent/name/mimeType-scoped file queries excluding trashed items
//! - Folder creation and multipart content uploads (create and update)
//! - Revision history listing and per-revision retention patches
//! - Structured API error decoding into `StoreError::Api`

pub mod connector;
pub mod types;

pub use connector::DriveConnector;
