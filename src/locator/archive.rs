//! Zip and jar archive access.

use std::collections::BTreeSet;
use std::fs::File;

use camino::Utf8Path;
use zip::ZipArchive;

use super::{EntryVisitor, ResourceEntry};
use crate::error::{ExtractionError, Result};

fn open(path: &Utf8Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|source| ExtractionError::io(path, source))?;
    ZipArchive::new(file).map_err(|source| archive_error(path, source))
}

fn archive_error(path: &Utf8Path, source: zip::result::ZipError) -> ExtractionError {
    match source {
        zip::result::ZipError::Io(io) => ExtractionError::io(path, io),
        other => ExtractionError::Archive {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// File entry names under `scope`, sorted.
fn names_under(archive: &ZipArchive<File>, scope: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(scope) && !name.ends_with('/'))
        .map(str::to_owned)
        .collect();
    names.sort_unstable();
    names
}

pub(super) fn contains(path: &Utf8Path, scope: &str) -> Result<bool> {
    let archive = open(path)?;
    Ok(archive
        .file_names()
        .any(|name| name.starts_with(scope) && !name.ends_with('/')))
}

pub(super) fn walk(path: &Utf8Path, scope: &str, visit: &mut EntryVisitor<'_>) -> Result<()> {
    let mut archive = open(path)?;
    for name in names_under(&archive, scope) {
        let mut file = archive
            .by_name(&name)
            .map_err(|source| archive_error(path, source))?;
        if file.is_dir() {
            continue;
        }
        let size = file.size();
        let stamp = u64::from(file.crc32());
        visit(ResourceEntry::new(name, size, stamp, &mut file))?;
    }
    Ok(())
}

/// Collect the directory names directly below `scope`.
///
/// Children are derived from file paths, so `scope/jquery/jquery.js` yields
/// `jquery` while a bare `scope/jquery/` directory entry yields nothing.
pub(super) fn child_dirs(path: &Utf8Path, scope: &str, out: &mut BTreeSet<String>) -> Result<()> {
    let archive = open(path)?;
    for name in archive.file_names().filter(|name| !name.ends_with('/')) {
        let Some(rest) = name.strip_prefix(scope) else {
            continue;
        };
        if let Some((child, _)) = rest.split_once('/').filter(|(child, _)| !child.is_empty()) {
            out.insert(child.to_owned());
        }
    }
    Ok(())
}
