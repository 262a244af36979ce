//! Error types for WebJar extraction.
//!
//! Every variant that concerns a concrete file or archive entry carries the
//! offending path so callers can report it without extra context.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::package_name::PackageName;

/// Errors arising while locating, mapping or extracting WebJar resources.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No search location exposes the requested package under the prefix.
    #[error("webjar {package} not found under {prefix}")]
    NotFound {
        /// The package that was requested.
        package: PackageName,
        /// The resource prefix that was searched.
        prefix: String,
    },

    /// An archive entry without the expected prefix reached the path mapper.
    #[error("archive path {path} does not start with {prefix}")]
    InvalidPath {
        /// The archive-relative path of the entry.
        path: String,
        /// The prefix the mapper strips.
        prefix: String,
    },

    /// An entry path would resolve outside the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending archive-relative path.
        path: String,
    },

    /// Reading a resource or writing its destination failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file or directory being read or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An archive could not be opened or decoded.
    #[error("unreadable archive {path}: {source}")]
    Archive {
        /// The archive on disk.
        path: Utf8PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },
}

impl ExtractionError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`ExtractionError`].
pub type Result<T> = std::result::Result<T, ExtractionError>;
