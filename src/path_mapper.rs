//! Mapping from archive resource paths to destination paths.
//!
//! Archive entries live under a reserved prefix such as
//! `META-INF/resources/webjars/`. The mapper strips that prefix to obtain a
//! destination key (`jquery/jquery.js`) and re-roots the key under a
//! destination directory. Keys are always `/`-separated so they stay stable
//! across platforms and runs.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{ExtractionError, Result};

/// Prefix under which WebJar archives carry their resources.
pub const WEBJARS_PREFIX: &str = "META-INF/resources/webjars/";

/// Prefix for packages laid out as node modules.
pub const NODE_MODULES_PREFIX: &str = "META-INF/resources/node_modules/";

/// Strips a fixed prefix from archive paths and re-roots them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    prefix: String,
}

impl PathMapper {
    /// Create a mapper for `prefix`.
    ///
    /// A missing trailing `/` is added so that `a/b` never matches `a/bc/...`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut normalised = prefix.into();
        if !normalised.is_empty() && !normalised.ends_with('/') {
            normalised.push('/');
        }
        Self { prefix: normalised }
    }

    /// The normalised prefix, always ending in `/` unless empty.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `archive_path` lies under this mapper's prefix.
    #[must_use]
    pub fn covers(&self, archive_path: &str) -> bool {
        archive_path.starts_with(&self.prefix)
    }

    /// Convert an archive path into a destination key.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidPath`] when `archive_path` does not
    /// start with the prefix, and [`ExtractionError::PathTraversal`] when the
    /// remainder is empty or contains `.`, `..`, empty or backslashed
    /// segments.
    pub fn map(&self, archive_path: &str) -> Result<String> {
        let relative =
            archive_path
                .strip_prefix(&self.prefix)
                .ok_or_else(|| ExtractionError::InvalidPath {
                    path: archive_path.to_owned(),
                    prefix: self.prefix.clone(),
                })?;
        validate_relative(relative)?;
        Ok(relative.to_owned())
    }

    /// Re-root a destination key under `root`.
    #[must_use]
    pub fn destination(&self, root: &Utf8Path, key: &str) -> Utf8PathBuf {
        key.split('/')
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl Default for PathMapper {
    fn default() -> Self {
        Self::new(WEBJARS_PREFIX)
    }
}

/// Reject keys that would escape the destination root (zip-slip).
fn validate_relative(relative: &str) -> Result<()> {
    let escapes = relative.is_empty()
        || relative
            .split('/')
            .any(|segment| matches!(segment, "" | "." | "..") || segment.contains('\\'));
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: relative.to_owned(),
        });
    }
    Ok(())
}
