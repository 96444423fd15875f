//! # Core Runtime
//!
//! Process-level infrastructure shared by the workspace crates. Currently
//! this is the `tracing` bootstrap; anything else cross-cutting (metrics,
//! panic hooks) would live here too.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
