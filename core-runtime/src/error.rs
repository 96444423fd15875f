use thiserror::Error;

/// Failures raised while bootstrapping process infrastructure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid runtime configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
