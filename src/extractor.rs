//! Incremental extraction of WebJar resources onto the filesystem.
//!
//! The [`Extractor`] ties a [`ResourceLocator`], two [`PathMapper`]s (one for
//! the WebJar namespace, one for node modules) and a [`Cache`] together. Each
//! request walks the matching archive entries afresh and copies an entry only
//! when the cache cannot vouch for the file already on disk.

use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File};
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};

use crate::cache::{Cache, MemoryCache};
use crate::error::{ExtractionError, Result};
use crate::locator::{ResourceEntry, ResourceLocator, scope_of};
use crate::package_name::PackageName;
use crate::path_mapper::{NODE_MODULES_PREFIX, PathMapper, WEBJARS_PREFIX};

/// Which part of the resource tree a request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A single package under the WebJar prefix.
    Package(PackageName),
    /// Every package under the WebJar prefix.
    All,
    /// Every package under the node-modules prefix.
    NodeModules,
}

/// One extraction to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    scope: Scope,
    destination: Utf8PathBuf,
    filter: Option<String>,
}

impl ExtractionRequest {
    /// Extract `package` below `destination`.
    #[must_use]
    pub fn package(package: impl Into<PackageName>, destination: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Scope::Package(package.into()), destination)
    }

    /// Extract every WebJar package below `destination`.
    #[must_use]
    pub fn all(destination: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Scope::All, destination)
    }

    /// Extract every node module below `destination`.
    #[must_use]
    pub fn node_modules(destination: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Scope::NodeModules, destination)
    }

    /// Create a request for `scope` without a sub-path filter.
    #[must_use]
    pub fn new(scope: Scope, destination: impl Into<Utf8PathBuf>) -> Self {
        Self {
            scope,
            destination: destination.into(),
            filter: None,
        }
    }

    /// Only extract entries whose package-relative path starts with the
    /// segments of `sub_path`, for example `dist` or `css/themes`.
    ///
    /// A filter made only of separators matches everything.
    #[must_use]
    pub fn with_filter(mut self, sub_path: impl Into<String>) -> Self {
        self.filter = Some(sub_path.into());
        self
    }

    /// The part of the resource tree to extract.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Root directory that receives the extracted packages.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// The sub-path filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

/// Outcome of one request: destination keys written and keys left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    written: Vec<String>,
    skipped: Vec<String>,
}

impl ExtractionSummary {
    /// Keys whose files were (re)written, in walk order.
    #[must_use]
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Keys the cache confirmed as current, in walk order.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Returns true when nothing was written.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.written.is_empty()
    }

    /// Append the keys of `other`.
    pub fn merge(&mut self, other: Self) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
    }
}

/// Package-relative path segments an entry must start with.
struct SubPathFilter<'a> {
    segments: Vec<&'a str>,
}

impl<'a> SubPathFilter<'a> {
    fn parse(sub_path: Option<&'a str>) -> Self {
        let segments = sub_path
            .map(|path| path.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        Self { segments }
    }

    fn matches(&self, key: &str) -> bool {
        let mut relative = key.split('/').skip(1);
        self.segments
            .iter()
            .all(|wanted| relative.next() == Some(*wanted))
    }
}

/// Copies WebJar resources to disk, skipping files the cache vouches for.
///
/// # Examples
///
/// ```no_run
/// use webjars_extractor::{Extractor, SearchPathLocator};
///
/// let locator = SearchPathLocator::new(["lib/jquery-3.7.1.jar"]);
/// let mut extractor = Extractor::new(locator);
/// let summary = extractor.extract_one_to("jquery", "target/web")?;
/// println!("{} file(s) written", summary.written().len());
/// # Ok::<(), webjars_extractor::ExtractionError>(())
/// ```
#[derive(Debug)]
pub struct Extractor<L, C = MemoryCache> {
    locator: L,
    cache: C,
    webjars: PathMapper,
    node_modules: PathMapper,
}

impl<L: ResourceLocator> Extractor<L> {
    /// Create an extractor with a fresh [`MemoryCache`].
    #[must_use]
    pub fn new(locator: L) -> Self {
        Self::with_cache(locator, MemoryCache::new())
    }
}

impl<L: ResourceLocator, C: Cache> Extractor<L, C> {
    /// Create an extractor that records fingerprints in `cache`.
    #[must_use]
    pub fn with_cache(locator: L, cache: C) -> Self {
        Self {
            locator,
            cache,
            webjars: PathMapper::new(WEBJARS_PREFIX),
            node_modules: PathMapper::new(NODE_MODULES_PREFIX),
        }
    }

    /// Replace the WebJar resource prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.webjars = PathMapper::new(prefix);
        self
    }

    /// Replace the node-modules resource prefix.
    #[must_use]
    pub fn with_node_modules_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.node_modules = PathMapper::new(prefix);
        self
    }

    /// Extract every resource of `package` to `destination/<package>/`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::NotFound`] before touching the disk when no
    /// location exposes `package`, and any error [`Self::extract`] reports.
    pub fn extract_one_to(
        &mut self,
        package: impl Into<PackageName>,
        destination: impl Into<Utf8PathBuf>,
    ) -> Result<ExtractionSummary> {
        self.extract(&ExtractionRequest::package(package, destination))
    }

    /// Extract every WebJar package to `destination`.
    ///
    /// # Errors
    ///
    /// See [`Self::extract`].
    pub fn extract_all_to(
        &mut self,
        destination: impl Into<Utf8PathBuf>,
    ) -> Result<ExtractionSummary> {
        self.extract(&ExtractionRequest::all(destination))
    }

    /// Extract every node module to `destination`.
    ///
    /// # Errors
    ///
    /// See [`Self::extract`].
    pub fn extract_node_modules_to(
        &mut self,
        destination: impl Into<Utf8PathBuf>,
    ) -> Result<ExtractionSummary> {
        self.extract(&ExtractionRequest::node_modules(destination))
    }

    /// Run `request`.
    ///
    /// When several locations provide the same destination key, the first in
    /// search order wins and later copies are ignored for this request.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::NotFound`] for an unknown package or one
    /// whose name is not a single path segment,
    /// [`ExtractionError::PathTraversal`] for an entry escaping the
    /// destination, [`ExtractionError::Archive`] for an unreadable archive and
    /// [`ExtractionError::Io`] when reading an entry or writing its file
    /// fails. Files written before the failure are kept and recorded.
    pub fn extract(&mut self, request: &ExtractionRequest) -> Result<ExtractionSummary> {
        let Self {
            locator,
            cache,
            webjars,
            node_modules,
        } = self;

        let (mapper, child) = match request.scope() {
            Scope::Package(package) if !package.is_single_segment() => {
                return Err(not_found(package, webjars.prefix()));
            }
            Scope::Package(package) => (&*webjars, Some(package.as_str())),
            Scope::All => (&*webjars, None),
            Scope::NodeModules => (&*node_modules, None),
        };

        let locations = locator.locate(&scope_of(mapper.prefix(), child))?;
        if locations.is_empty() {
            if let Scope::Package(package) = request.scope() {
                return Err(not_found(package, mapper.prefix()));
            }
            log::info!("nothing to extract under {}", mapper.prefix());
            return Ok(ExtractionSummary::default());
        }

        let filter = SubPathFilter::parse(request.filter());
        let root = request.destination();
        let mut seen = HashSet::new();
        let mut summary = ExtractionSummary::default();

        for location in &locations {
            log::debug!("walking {location}");
            let mut visit = |mut entry: ResourceEntry<'_>| -> Result<()> {
                let key = mapper.map(entry.path())?;
                if !filter.matches(&key) {
                    return Ok(());
                }
                if !seen.insert(key.clone()) {
                    log::debug!("{key}: already provided by an earlier location");
                    return Ok(());
                }
                let destination = mapper.destination(root, &key);
                if sync_entry(&mut *cache, &key, &destination, location.path(), &mut entry)? {
                    summary.written.push(key);
                } else {
                    summary.skipped.push(key);
                }
                Ok(())
            };
            locator.entries(location, mapper.prefix(), child, &mut visit)?;
        }

        log::info!(
            "extracted {} to {root}: {} written, {} up to date",
            describe(request.scope()),
            summary.written.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Names of every package under the WebJar prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if a location cannot be read.
    pub fn list_packages(&self) -> Result<BTreeSet<PackageName>> {
        Ok(self
            .locator
            .list_children(self.webjars.prefix())?
            .into_iter()
            .map(PackageName::from)
            .collect())
    }

    /// The locator resources are read from.
    #[must_use]
    pub const fn locator(&self) -> &L {
        &self.locator
    }

    /// The cache consulted before each write.
    #[must_use]
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Mutable access to the cache, for example to `load` or `save` it.
    #[must_use]
    pub const fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Consume the extractor and return its cache.
    #[must_use]
    pub fn into_cache(self) -> C {
        self.cache
    }
}

fn not_found(package: &PackageName, prefix: &str) -> ExtractionError {
    ExtractionError::NotFound {
        package: package.clone(),
        prefix: prefix.to_owned(),
    }
}

fn describe(scope: &Scope) -> String {
    match scope {
        Scope::Package(package) => format!("webjar {package}"),
        Scope::All => "all webjars".to_owned(),
        Scope::NodeModules => "node modules".to_owned(),
    }
}

/// Tracks whether the wrapped reader failed, so a failed copy can be
/// blamed on the entry rather than the destination.
struct ReadSide<R> {
    inner: R,
    failed: bool,
}

impl<R: Read> Read for ReadSide<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.inner.read(buf);
        self.failed |= result
            .as_ref()
            .is_err_and(|err| err.kind() != io::ErrorKind::Interrupted);
        result
    }
}

/// Bring one destination file in line with its entry.
///
/// Returns `true` when the file was written. A read failure is reported
/// against the entry inside `location`, a write failure against
/// `destination`.
fn sync_entry<C: Cache + ?Sized>(
    cache: &mut C,
    key: &str,
    destination: &Utf8Path,
    location: &Utf8Path,
    entry: &mut ResourceEntry<'_>,
) -> Result<bool> {
    let fingerprint = entry.fingerprint();
    if cache.is_up_to_date(key, &fingerprint) && destination.is_file() {
        log::debug!("{key}: up to date");
        return Ok(false);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|source| ExtractionError::io(parent, source))?;
    }
    let mut file =
        File::create(destination).map_err(|source| ExtractionError::io(destination, source))?;
    let mut reader = ReadSide {
        inner: &mut *entry,
        failed: false,
    };
    let copied = match io::copy(&mut reader, &mut file) {
        Ok(copied) => copied,
        Err(source) if reader.failed => {
            return Err(ExtractionError::io(location.join(entry.path()), source));
        }
        Err(source) => return Err(ExtractionError::io(destination, source)),
    };
    cache.put(key, fingerprint);

    log::debug!("{key}: wrote {copied} bytes to {destination}");
    Ok(true)
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
