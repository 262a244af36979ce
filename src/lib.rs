//! Incremental extraction of WebJar resources onto the filesystem.
//!
//! WebJars are ordinary zip or jar archives that carry front-end libraries
//! under `META-INF/resources/webjars/<package>/`. This crate copies those
//! resources into a plain directory tree (`<dest>/<package>/...`) so that
//! build and serving pipelines can treat them as static files.
//!
//! The moving parts are:
//!
//! - [`locator`]: finds archives and exploded directories that carry
//!   resources and walks their entries.
//! - [`path_mapper`]: strips the resource prefix and re-roots entries under a
//!   destination, rejecting paths that would escape it.
//! - [`cache`]: remembers the fingerprint of every file written so that
//!   unchanged resources are not copied again.
//! - [`extractor`]: drives the three for one package, every package or the
//!   node-modules namespace.
//! - [`config`]: TOML settings shared with the command-line front end.

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod package_name;
pub mod path_mapper;

pub use cache::{Cache, CacheError, Cacheable, FileCache, MemoryCache, NoopCache};
pub use config::{ConfigError, ExtractorConfig};
pub use error::{ExtractionError, Result};
pub use extractor::{ExtractionRequest, ExtractionSummary, Extractor, Scope};
pub use locator::{ArchiveLocation, ResourceEntry, ResourceLocator, SearchPathLocator};
pub use package_name::PackageName;
pub use path_mapper::{NODE_MODULES_PREFIX, PathMapper, WEBJARS_PREFIX};
