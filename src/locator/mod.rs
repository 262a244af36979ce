//! Discovery of archive locations carrying WebJar resources.
//!
//! A [`ResourceLocator`] answers three questions for the extractor: which
//! locations hold anything under a prefix, what the entries under a prefix
//! are, and which package names sit directly below it. Locations may be zip
//! or jar archives or exploded directories; callers never need to tell them
//! apart.
//!
//! Entries are produced lazily through a visitor, one open stream at a time,
//! so a walk never holds more than a single entry reader.

mod archive;
mod directory;
mod search_path;

pub use search_path::SearchPathLocator;

use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};

use crate::cache::Cacheable;
use crate::error::Result;

/// Callback receiving each entry of a walk.
pub type EntryVisitor<'v> = dyn for<'e> FnMut(ResourceEntry<'e>) -> Result<()> + 'v;

/// One place resources can be read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArchiveLocation {
    /// A zip or jar file.
    Archive(Utf8PathBuf),
    /// A directory laid out like an unpacked archive.
    Directory(Utf8PathBuf),
}

impl ArchiveLocation {
    /// Classify `path`: directories are exploded trees, anything else is
    /// treated as an archive file.
    #[must_use]
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Self {
        let root = path.into();
        if root.is_dir() {
            Self::Directory(root)
        } else {
            Self::Archive(root)
        }
    }

    /// The filesystem path of the location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Archive(path) | Self::Directory(path) => path,
        }
    }
}

impl fmt::Display for ArchiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A single resource visited during a walk.
///
/// The entry borrows its byte stream from the open archive or file, so it
/// only lives for the duration of one visitor call.
pub struct ResourceEntry<'a> {
    path: String,
    size: u64,
    stamp: u64,
    reader: &'a mut dyn Read,
}

impl<'a> ResourceEntry<'a> {
    /// Create an entry for the archive-relative `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, size: u64, stamp: u64, reader: &'a mut dyn Read) -> Self {
        Self {
            path: path.into(),
            size,
            stamp,
            reader,
        }
    }

    /// Archive-relative, `/`-separated path including the prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Uncompressed size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Fingerprint of the entry as the cache records it.
    #[must_use]
    pub const fn fingerprint(&self) -> Cacheable {
        Cacheable::new(self.size, self.stamp)
    }
}

impl Read for ResourceEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ResourceEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceEntry")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("stamp", &self.stamp)
            .finish_non_exhaustive()
    }
}

/// Source of archive locations and their entries.
pub trait ResourceLocator {
    /// Every location holding at least one file under `prefix`, in search
    /// order and without duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if a location exists but cannot be read.
    fn locate(&self, prefix: &str) -> Result<Vec<ArchiveLocation>>;

    /// Visit each file of `location` under `prefix`, or under
    /// `prefix/child/` when `child` is given.
    ///
    /// Directory entries are not visited. Visiting stops at the first error,
    /// whether raised by the locator or returned by `visit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read or `visit` fails.
    fn entries(
        &self,
        location: &ArchiveLocation,
        prefix: &str,
        child: Option<&str>,
        visit: &mut EntryVisitor<'_>,
    ) -> Result<()>;

    /// Names of the immediate child directories of `prefix` across every
    /// location ("top-level package names").
    ///
    /// # Errors
    ///
    /// Returns an error if a location exists but cannot be read.
    fn list_children(&self, prefix: &str) -> Result<BTreeSet<String>>;
}

/// Join `prefix` and an optional child into a walk scope ending in `/`.
pub(crate) fn scope_of(prefix: &str, child: Option<&str>) -> String {
    let mut scope = prefix.to_owned();
    if !scope.is_empty() && !scope.ends_with('/') {
        scope.push('/');
    }
    if let Some(name) = child {
        scope.push_str(name);
        scope.push('/');
    }
    scope
}
