//! JSON file-backed cache that survives process restarts.
//!
//! The file holds a format version and one entry per destination key:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "jquery/jquery.js": { "size": 10, "stamp": 3735928559 }
//!   }
//! }
//! ```
//!
//! A file that cannot be parsed, or that carries another format version, is
//! treated as empty: the next extraction rewrites every file and `save`
//! replaces the damaged content.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::{Cache, CacheError, Cacheable};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: BTreeMap<String, Cacheable>,
}

/// Cache persisted as a JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: Utf8PathBuf,
    entries: BTreeMap<String, Cacheable>,
    recovered_from_corrupt_file: bool,
}

impl FileCache {
    /// Create an empty cache bound to `path` without touching the disk.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            recovered_from_corrupt_file: false,
        }
    }

    /// Create a cache bound to `path` and load it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] if the file exists but cannot be read.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, CacheError> {
        let mut cache = Self::new(path);
        cache.load()?;
        Ok(cache)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Number of recorded keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fingerprint recorded for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Cacheable> {
        self.entries.get(key)
    }

    /// Returns true when the last `load` discarded an unreadable document.
    #[must_use]
    pub const fn recovered_from_corrupt_file(&self) -> bool {
        self.recovered_from_corrupt_file
    }
}

impl Cache for FileCache {
    fn is_up_to_date(&self, key: &str, candidate: &Cacheable) -> bool {
        self.entries.get(key) == Some(candidate)
    }

    fn put(&mut self, key: &str, value: Cacheable) {
        self.entries.insert(key.to_owned(), value);
    }

    fn load(&mut self) -> Result<(), CacheError> {
        self.recovered_from_corrupt_file = false;
        if !self.path.exists() {
            self.entries.clear();
            return Ok(());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| CacheError::Read {
                path: self.path.clone(),
                source,
            })?;

        match serde_json::from_str::<CacheFile>(&content) {
            Ok(file) if file.version == FORMAT_VERSION => {
                log::debug!("cache {}: loaded {} entries", self.path, file.entries.len());
                self.entries = file.entries;
            }
            Ok(file) => {
                log::warn!(
                    "cache {}: unsupported format version {}, starting empty",
                    self.path,
                    file.version
                );
                self.entries.clear();
                self.recovered_from_corrupt_file = true;
            }
            Err(err) => {
                log::warn!("cache {}: unreadable ({err}), starting empty", self.path);
                self.entries.clear();
                self.recovered_from_corrupt_file = true;
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let document = CacheFile {
            version: FORMAT_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|source| CacheError::Serialize { source })?;
        std::fs::write(&self.path, json).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("cache {}: saved {} entries", self.path, self.entries.len());
        Ok(())
    }
}
