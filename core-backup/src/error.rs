use bridge_traits::error::StoreError;
use core_versioner::error::VersionerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    /// Construction-time validation: the namespace option is mandatory.
    #[error("The ns option must be specified")]
    MissingNamespace,

    /// The configured discriminator pattern does not compile.
    #[error("Invalid discriminator regex {regex}: {source}")]
    RegexInvalid {
        regex: String,
        #[source]
        source: regex::Error,
    },

    /// `run` was invoked before both filters were injected.
    #[error("No {which} filter has been set")]
    FilterNotSet { which: &'static str },

    /// The discriminator pattern's first capture group matched nothing in
    /// the filename.
    #[error(
        "Cannot get discriminator from filename using supplied regex. \
         Filename: {filename}, Regex: {regex}"
    )]
    DiscriminatorRegex { filename: String, regex: String },

    /// Versioning failure, re-surfaced unchanged.
    #[error(transparent)]
    Versioner(#[from] VersionerError),

    /// Bucket-side failure, re-surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, BackupError>;
