//! # Cloud Storage Provider
//!
//! Implements the `BucketStore` trait for the Cloud Storage JSON API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Paginated object listing scoped to one bucket
//! - `alt=media` downloads written to a caller-supplied local path
//! - Object deletion
//! - Structured API error decoding into `StoreError::Api`

pub mod connector;
pub mod types;

pub use connector::CloudStorageConnector;
