//! Error types for the `webjars-extract` binary.

use thiserror::Error;
use webjars_extractor::{CacheError, ConfigError, ExtractionError};

/// Errors that end a `webjars-extract` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Locating or extracting resources failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The cache file could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Writing command output failed.
    #[error("failed to write output: {source}")]
    Output {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
