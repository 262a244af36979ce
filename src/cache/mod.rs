//! Change-detection cache for extracted resources.
//!
//! The extractor asks a [`Cache`] whether a destination key still matches the
//! fingerprint of its source entry and records a fresh [`Cacheable`] after
//! every write. Keys are destination-relative paths such as
//! `jquery/jquery.js`, which stay stable no matter which archive supplied the
//! bytes.
//!
//! # Implementations
//!
//! - [`MemoryCache`] - map-backed, lives for one process (the default).
//! - [`NoopCache`] - never up to date, so every entry is always extracted.
//! - [`FileCache`] - JSON file on disk, survives process restarts.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::{MemoryCache, NoopCache};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Fingerprint of one resource at extraction time.
///
/// `stamp` is a source-defined change marker: the CRC-32 stored in the
/// central directory for zip entries, and the modification time in
/// milliseconds since the Unix epoch for files in exploded directories.
/// Two fingerprints match only when both fields are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cacheable {
    size: u64,
    stamp: u64,
}

impl Cacheable {
    /// Create a fingerprint from a size in bytes and a change stamp.
    #[must_use]
    pub const fn new(size: u64, stamp: u64) -> Self {
        Self { size, stamp }
    }

    /// Content length in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Source change stamp.
    #[must_use]
    pub const fn stamp(&self) -> u64 {
        self.stamp
    }
}

/// Store of last-known fingerprints keyed by destination path.
///
/// A check and a record, plus `load` and `save` hooks that only persistent
/// implementations need. Implementations are not required to be thread-safe.
#[cfg_attr(test, mockall::automock)]
pub trait Cache {
    /// Whether `key` was last recorded with exactly `candidate`.
    ///
    /// An absent key is never up to date.
    fn is_up_to_date(&self, key: &str, candidate: &Cacheable) -> bool;

    /// Record `value` as the current fingerprint for `key`.
    fn put(&mut self, key: &str, value: Cacheable);

    /// Populate the cache from its backing store.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backing store cannot be read.
    fn load(&mut self) -> Result<(), CacheError> {
        Ok(())
    }

    /// Flush the cache to its backing store.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backing store cannot be written.
    fn save(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

impl<C: Cache + ?Sized> Cache for &mut C {
    fn is_up_to_date(&self, key: &str, candidate: &Cacheable) -> bool {
        (**self).is_up_to_date(key, candidate)
    }

    fn put(&mut self, key: &str, value: Cacheable) {
        (**self).put(key, value);
    }

    fn load(&mut self) -> Result<(), CacheError> {
        (**self).load()
    }

    fn save(&self) -> Result<(), CacheError> {
        (**self).save()
    }
}

impl<C: Cache + ?Sized> Cache for Box<C> {
    fn is_up_to_date(&self, key: &str, candidate: &Cacheable) -> bool {
        (**self).is_up_to_date(key, candidate)
    }

    fn put(&mut self, key: &str, value: Cacheable) {
        (**self).put(key, value);
    }

    fn load(&mut self) -> Result<(), CacheError> {
        (**self).load()
    }

    fn save(&self) -> Result<(), CacheError> {
        (**self).save()
    }
}

/// Errors that prevent cache persistence.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading the cache file failed.
    #[error("failed to read cache file {path}: {source}")]
    Read {
        /// File path that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the cache file's parent directory failed.
    #[error("failed to create cache directory {path}: {source}")]
    CreateDirectory {
        /// Directory path that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing cache entries failed.
    #[error("failed to serialize cache: {source}")]
    Serialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the cache file failed.
    #[error("failed to write cache file {path}: {source}")]
    Write {
        /// File path that could not be written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_compare_field_wise() {
        let base = Cacheable::new(10, 42);
        assert_eq!(base, Cacheable::new(10, 42));
        assert_ne!(base, Cacheable::new(11, 42));
        assert_ne!(base, Cacheable::new(10, 43));
    }

    #[test]
    fn mutable_reference_forwards_to_inner_cache() {
        let mut inner = MemoryCache::new();
        {
            let mut borrowed: &mut MemoryCache = &mut inner;
            <&mut MemoryCache as Cache>::put(
                &mut borrowed,
                "jquery/jquery.js",
                Cacheable::new(10, 1),
            );
        }
        assert!(inner.is_up_to_date("jquery/jquery.js", &Cacheable::new(10, 1)));
    }

    #[test]
    fn boxed_cache_forwards_to_inner_cache() {
        let mut boxed: Box<dyn Cache> = Box::new(MemoryCache::new());
        boxed.put("bootstrap/css/bootstrap.css", Cacheable::new(3, 7));
        assert!(boxed.is_up_to_date("bootstrap/css/bootstrap.css", &Cacheable::new(3, 7)));
        assert!(boxed.load().is_ok());
        assert!(boxed.save().is_ok());
    }
}
