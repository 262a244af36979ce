//! Extractor configuration loaded from TOML.
//!
//! Every field is optional; an empty file yields the built-in prefixes, no
//! search roots and an in-memory cache.
//!
//! ```toml
//! prefix = "META-INF/resources/webjars/"
//! node_modules_prefix = "META-INF/resources/node_modules/"
//! search_paths = ["lib/jquery-3.7.1.jar", "target/classes"]
//! search_dirs = ["lib"]
//! cache_file = "target/webjars-cache.json"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::Cache;
use crate::error::ExtractionError;
use crate::extractor::Extractor;
use crate::locator::SearchPathLocator;
use crate::path_mapper::{NODE_MODULES_PREFIX, WEBJARS_PREFIX};

/// Settings shared by the library and the command-line front end.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Prefix under which WebJar resources live inside archives.
    pub prefix: String,
    /// Prefix under which node-module resources live inside archives.
    pub node_modules_prefix: String,
    /// Archives and exploded directories searched in order.
    pub search_paths: Vec<Utf8PathBuf>,
    /// Directories whose `*.jar` and `*.zip` files are appended to the
    /// search path, after `search_paths`.
    pub search_dirs: Vec<Utf8PathBuf>,
    /// JSON cache file persisting fingerprints between runs. Without it the
    /// cache lives in memory only.
    pub cache_file: Option<Utf8PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            prefix: WEBJARS_PREFIX.to_owned(),
            node_modules_prefix: NODE_MODULES_PREFIX.to_owned(),
            search_paths: Vec::new(),
            search_dirs: Vec::new(),
            cache_file: None,
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ExtractorConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying parser error.
        #[source]
        source: toml::de::Error,
    },
}

impl ExtractorConfig {
    /// Reads and parses the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is malformed or has unknown keys.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |file| std::fs::read_to_string(file))
    }

    /// Loads configuration using the supplied reader.
    ///
    /// Exists so tests can provide file contents without touching the file
    /// system.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use webjars_extractor::ExtractorConfig;
    ///
    /// let config = ExtractorConfig::load_with(Utf8Path::new("webjars.toml"), |_| {
    ///     Ok("search_dirs = [\"lib\"]\n".to_owned())
    /// })?;
    /// assert_eq!(config.search_dirs, ["lib"]);
    /// # Ok::<(), webjars_extractor::config::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when `read` fails and
    /// [`ConfigError::Parse`] when its output is not a valid configuration.
    pub fn load_with<F>(path: &Utf8Path, read: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> std::io::Result<String>,
    {
        let source = read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a locator over `search_paths` followed by the archives found in
    /// `search_dirs`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Io`] when a search directory cannot be read.
    pub fn locator(&self) -> Result<SearchPathLocator, ExtractionError> {
        let mut locator = SearchPathLocator::default();
        self.extend_locator(&mut locator)?;
        Ok(locator)
    }

    /// Appends the configured roots to `locator`, after any it already has.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Io`] when a search directory cannot be read.
    pub fn extend_locator(&self, locator: &mut SearchPathLocator) -> Result<(), ExtractionError> {
        for path in &self.search_paths {
            locator.push(path.clone());
        }
        for dir in &self.search_dirs {
            locator.discover(dir)?;
        }
        Ok(())
    }

    /// Applies the configured prefixes to `extractor`.
    #[must_use]
    pub fn configure<C: Cache>(
        &self,
        extractor: Extractor<SearchPathLocator, C>,
    ) -> Extractor<SearchPathLocator, C> {
        extractor
            .with_prefix(self.prefix.as_str())
            .with_node_modules_prefix(self.node_modules_prefix.as_str())
    }
}
