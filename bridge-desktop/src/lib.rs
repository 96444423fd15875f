//! # Desktop Bridge Implementations
//!
//! Concrete implementations of the `bridge-traits` seams for desktop and
//! server processes. Currently this is the reqwest-backed
//! [`ReqwestHttpClient`]; platform-specific sinks would live here too.

pub mod http;

pub use http::ReqwestHttpClient;
