//! Shared fixtures for extraction integration tests.
//!
//! [`WebJarFixture`] owns a scratch directory with a `lib/` folder of
//! archives, an optional exploded `classes/` tree and an `out/` destination
//! that starts out missing.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use webjars_extractor::SearchPathLocator;
use zip::write::SimpleFileOptions;

/// Entries of the archive every standard fixture starts with.
pub const STANDARD_ENTRIES: &[(&str, &str)] = &[
    ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
    ("META-INF/resources/webjars/jquery/", ""),
    ("META-INF/resources/webjars/jquery/jquery.js", "0123456789"),
    ("META-INF/resources/webjars/jquery/jquery.min.js", "01234"),
    (
        "META-INF/resources/webjars/bootstrap/css/bootstrap.css",
        "body { margin: 0; }\n",
    ),
    (
        "META-INF/resources/webjars/bootstrap/js/bootstrap.js",
        "window.bootstrap = {};\n",
    ),
    (
        "META-INF/resources/node_modules/less/lib/less/tree/alpha.js",
        "module.exports = function alpha() {};\n",
    ),
];

/// Scratch tree holding source archives and an extraction destination.
pub struct WebJarFixture {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl WebJarFixture {
    /// An empty fixture with a `lib/` directory and no archives.
    pub fn empty() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root =
            Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp dir path not UTF-8");
        std::fs::create_dir_all(root.join("lib")).expect("create lib dir");
        Self { _temp: temp, root }
    }

    /// A fixture whose `lib/webjars.jar` carries [`STANDARD_ENTRIES`].
    pub fn standard() -> Self {
        let fixture = Self::empty();
        fixture.add_jar("webjars.jar", STANDARD_ENTRIES);
        fixture
    }

    /// Scratch root; everything else lives below it.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes `lib/<name>` as a zip archive. Names ending in `/` become
    /// directory entries.
    pub fn add_jar(&self, name: &str, entries: &[(&str, &str)]) -> Utf8PathBuf {
        let path = self.root.join("lib").join(name);
        let file = std::fs::File::create(&path).expect("create archive");
        let mut writer = zip::ZipWriter::new(file);
        for (entry, content) in entries {
            if entry.ends_with('/') {
                writer
                    .add_directory(*entry, SimpleFileOptions::default())
                    .expect("add directory entry");
            } else {
                writer
                    .start_file(*entry, SimpleFileOptions::default())
                    .expect("start file entry");
                writer.write_all(content.as_bytes()).expect("write entry");
            }
        }
        writer.finish().expect("finish archive");
        path
    }

    /// Writes an exploded tree at `<name>/` below the root.
    pub fn add_tree(&self, name: &str, entries: &[(&str, &str)]) -> Utf8PathBuf {
        let dir = self.root.join(name);
        for (entry, content) in entries {
            let path = dir.join(entry);
            std::fs::create_dir_all(path.parent().expect("entry parent")).expect("create parents");
            std::fs::write(&path, content).expect("write tree file");
        }
        dir
    }

    /// Locator over every archive in `lib/`.
    pub fn locator(&self) -> SearchPathLocator {
        let mut locator = SearchPathLocator::default();
        locator.discover(&self.root.join("lib")).expect("discover archives");
        locator
    }

    /// Extraction destination; missing until something is written.
    pub fn dest(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    /// Location for a persistent cache file.
    pub fn cache_path(&self) -> Utf8PathBuf {
        self.root.join("state").join("webjars-cache.json")
    }

    /// Every file under the destination as a sorted list of `/` paths.
    pub fn extracted_files(&self) -> Vec<String> {
        fn walk(dir: &Utf8Path, prefix: &str, out: &mut Vec<String>) {
            for dir_entry in dir.read_dir_utf8().expect("read destination") {
                let entry = dir_entry.expect("destination entry");
                let name = format!("{prefix}{}", entry.file_name());
                if entry.path().is_dir() {
                    walk(entry.path(), &format!("{name}/"), out);
                } else {
                    out.push(name);
                }
            }
        }

        let mut files = Vec::new();
        let dest = self.dest();
        if dest.exists() {
            walk(&dest, "", &mut files);
        }
        files.sort();
        files
    }

    /// Contents of the extracted file at `key`.
    pub fn read(&self, key: &str) -> String {
        std::fs::read_to_string(self.dest().join(key)).expect("read extracted file")
    }

    /// Replaces the extracted file at `key`, creating parents as needed.
    pub fn write_dest(&self, key: &str, content: &str) {
        let path = self.dest().join(key);
        let parent = path.parent().expect("destination parent");
        std::fs::create_dir_all(parent).expect("create parents");
        std::fs::write(path, content).expect("write destination file");
    }
}
