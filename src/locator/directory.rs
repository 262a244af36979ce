//! Exploded directory trees laid out like archives.
//!
//! The archive path of a file is its path relative to the location root,
//! joined with `/`. Symlinks are followed.

use std::collections::BTreeSet;
use std::fs::{File, Metadata};
use std::time::UNIX_EPOCH;

use camino::{Utf8DirEntry, Utf8Path, Utf8PathBuf};

use super::{EntryVisitor, ResourceEntry};
use crate::error::{ExtractionError, Result};

fn scope_dir(root: &Utf8Path, scope: &str) -> Utf8PathBuf {
    scope
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn sorted_entries(dir: &Utf8Path) -> Result<Vec<Utf8DirEntry>> {
    let mut entries = dir
        .read_dir_utf8()
        .map_err(|source| ExtractionError::io(dir, source))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|source| ExtractionError::io(dir, source))?;
    entries.sort_by(|a, b| a.file_name().cmp(b.file_name()));
    Ok(entries)
}

fn has_file(dir: &Utf8Path) -> Result<bool> {
    for entry in sorted_entries(dir)? {
        let path = entry.path();
        if path.is_file() || (path.is_dir() && has_file(path)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn collect_files(
    dir: &Utf8Path,
    relative: &str,
    out: &mut Vec<(String, Utf8PathBuf)>,
) -> Result<()> {
    for entry in sorted_entries(dir)? {
        let child = if relative.is_empty() {
            entry.file_name().to_owned()
        } else {
            format!("{relative}/{}", entry.file_name())
        };
        let path = entry.path();
        if path.is_dir() {
            collect_files(path, &child, out)?;
        } else if path.is_file() {
            out.push((child, path.to_path_buf()));
        }
    }
    Ok(())
}

/// Modification time in milliseconds since the Unix epoch, saturating.
fn modified_millis(metadata: &Metadata, path: &Utf8Path) -> Result<u64> {
    let modified = metadata
        .modified()
        .map_err(|source| ExtractionError::io(path, source))?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
}

pub(super) fn contains(root: &Utf8Path, scope: &str) -> Result<bool> {
    let dir = scope_dir(root, scope);
    if !dir.is_dir() {
        return Ok(false);
    }
    has_file(&dir)
}

pub(super) fn walk(root: &Utf8Path, scope: &str, visit: &mut EntryVisitor<'_>) -> Result<()> {
    let dir = scope_dir(root, scope);
    if !dir.is_dir() {
        return Ok(());
    }

    let mut files = Vec::new();
    collect_files(&dir, "", &mut files)?;

    for (relative, path) in files {
        let mut file = File::open(&path).map_err(|source| ExtractionError::io(&path, source))?;
        let metadata = file
            .metadata()
            .map_err(|source| ExtractionError::io(&path, source))?;
        let stamp = modified_millis(&metadata, &path)?;
        visit(ResourceEntry::new(
            format!("{scope}{relative}"),
            metadata.len(),
            stamp,
            &mut file,
        ))?;
    }
    Ok(())
}

pub(super) fn child_dirs(root: &Utf8Path, scope: &str, out: &mut BTreeSet<String>) -> Result<()> {
    let dir = scope_dir(root, scope);
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in sorted_entries(&dir)? {
        if entry.path().is_dir() && has_file(entry.path())? {
            out.insert(entry.file_name().to_owned());
        }
    }
    Ok(())
}
