//! Locator over an ordered list of archives and directories.

use std::collections::BTreeSet;
use std::ffi::OsStr;

use camino::{Utf8Path, Utf8PathBuf};

use super::{ArchiveLocation, EntryVisitor, ResourceLocator, archive, directory, scope_of};
use crate::error::{ExtractionError, Result};

const ARCHIVE_EXTENSIONS: [&str; 2] = ["jar", "zip"];

/// Searches a fixed, ordered set of roots, like a classpath.
///
/// Roots that do not exist are skipped when searching, so a stale entry on a
/// search path never fails an extraction.
///
/// # Examples
///
/// ```
/// use webjars_extractor::locator::SearchPathLocator;
///
/// let locator = SearchPathLocator::new(["lib/jquery.jar", "lib/jquery.jar"]);
/// assert_eq!(locator.roots().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
    roots: Vec<ArchiveLocation>,
}

impl SearchPathLocator {
    /// Create a locator over `roots`, dropping duplicates.
    #[must_use]
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut locator = Self::default();
        for root in roots {
            locator.push(root);
        }
        locator
    }

    /// Create a locator from a platform search path string such as
    /// `lib/a.jar:lib/b.jar` (`;` on Windows).
    #[must_use]
    pub fn from_search_path(value: &OsStr) -> Self {
        let mut locator = Self::default();
        locator.extend_search_path(value);
        locator
    }

    /// Append every entry of a platform search path string.
    ///
    /// Empty entries are ignored and entries that are not valid UTF-8 are
    /// skipped with a warning. Returns the number of roots added.
    pub fn extend_search_path(&mut self, value: &OsStr) -> usize {
        let mut added = 0;
        for path in std::env::split_paths(value) {
            match Utf8PathBuf::try_from(path) {
                Ok(root) if !root.as_str().is_empty() => {
                    if self.push(root) {
                        added += 1;
                    }
                }
                Ok(_) => {}
                Err(err) => log::warn!("skipping non UTF-8 search path entry: {err}"),
            }
        }
        added
    }

    /// Append `root` unless it is already present.
    ///
    /// Returns `false` when the root was a duplicate.
    pub fn push(&mut self, root: impl Into<Utf8PathBuf>) -> bool {
        let location = ArchiveLocation::from_path(root);
        if self.roots.contains(&location) {
            return false;
        }
        self.roots.push(location);
        true
    }

    /// Append every `*.jar` and `*.zip` file in `dir`, in name order.
    ///
    /// Returns the number of roots added.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Io`] if `dir` cannot be read.
    pub fn discover(&mut self, dir: &Utf8Path) -> Result<usize> {
        let mut found = Vec::new();
        for dir_entry in dir
            .read_dir_utf8()
            .map_err(|source| ExtractionError::io(dir, source))?
        {
            let entry = dir_entry.map_err(|source| ExtractionError::io(dir, source))?;
            let path = entry.path();
            let is_archive = path
                .extension()
                .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if is_archive && path.is_file() {
                found.push(path.to_path_buf());
            }
        }
        found.sort();

        let mut added = 0;
        for path in found {
            if self.push(path) {
                added += 1;
            }
        }
        log::debug!("discovered {added} archive(s) in {dir}");
        Ok(added)
    }

    /// The configured roots in search order.
    #[must_use]
    pub fn roots(&self) -> &[ArchiveLocation] {
        &self.roots
    }

    fn existing_roots(&self) -> impl Iterator<Item = &ArchiveLocation> {
        self.roots.iter().filter(|root| {
            let exists = root.path().exists();
            if !exists {
                log::debug!("search root {root} does not exist, skipping");
            }
            exists
        })
    }
}

impl ResourceLocator for SearchPathLocator {
    fn locate(&self, prefix: &str) -> Result<Vec<ArchiveLocation>> {
        let scope = scope_of(prefix, None);
        let mut found = Vec::new();
        for root in self.existing_roots() {
            let contains = match root {
                ArchiveLocation::Archive(path) => archive::contains(path, &scope)?,
                ArchiveLocation::Directory(path) => directory::contains(path, &scope)?,
            };
            if contains && !found.contains(root) {
                found.push(root.clone());
            }
        }
        Ok(found)
    }

    fn entries(
        &self,
        location: &ArchiveLocation,
        prefix: &str,
        child: Option<&str>,
        visit: &mut EntryVisitor<'_>,
    ) -> Result<()> {
        let scope = scope_of(prefix, child);
        match location {
            ArchiveLocation::Archive(path) => archive::walk(path, &scope, visit),
            ArchiveLocation::Directory(path) => directory::walk(path, &scope, visit),
        }
    }

    fn list_children(&self, prefix: &str) -> Result<BTreeSet<String>> {
        let scope = scope_of(prefix, None);
        let mut children = BTreeSet::new();
        for root in self.existing_roots() {
            match root {
                ArchiveLocation::Archive(path) => archive::child_dirs(path, &scope, &mut children)?,
                ArchiveLocation::Directory(path) => {
                    directory::child_dirs(path, &scope, &mut children)?;
                }
            }
        }
        Ok(children)
    }
}
