//! Per-directory index construction.
//!
//! A build is always a full rebuild: discovery runs, every file is read and
//! extracted, and the resulting record list replaces whatever was stored for
//! the directory before. Incremental reindexing is deliberately absent.

use ahash::AHashMap;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Instant;
use xxhash_rust::xxh3::xxh3_64;

use super::{discovery, extract};
use crate::error::{EngineError, Result};

/// One indexed source file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Full raw text, kept for fallback scoring and result payloads.
    pub text: String,
    /// Keyword to accumulated weight (occurrences plus structural boosts).
    pub terms: AHashMap<String, u32>,
    /// xxh3 of the raw text. Computed for every record; rebuilds never read
    /// it back, since incremental skip is out of contract.
    pub checksum: u64,
}

/// The fully indexed snapshot of one directory's matched files.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    pub records: Vec<FileRecord>,
}

impl DirectoryIndex {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds a fresh index for `directory` with the given extension filter.
///
/// A file that cannot be read is logged and skipped; it never aborts the
/// build. Finding nothing to index at all is a hard failure.
pub fn build(directory: &Path, extensions: &[String]) -> Result<DirectoryIndex> {
    let start = Instant::now();

    let mut files = discovery::enumerate(directory, extensions)?;
    if files.is_empty() {
        // The directory may be a container (e.g. a monorepo root handed in
        // one level too high); immediate subdirectories get one chance.
        files = enumerate_subdirectories(directory, extensions)?;
    }
    if files.is_empty() {
        return Err(EngineError::NoFilesFound {
            directory: directory.to_path_buf(),
            extensions: extensions.to_vec(),
        }
        .into());
    }

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Skipping unreadable file {}: {}", path.display(), err);
                continue;
            }
        };
        let checksum = xxh3_64(text.as_bytes());
        let terms = extract::extract(&text);
        records.push(FileRecord {
            path,
            text,
            terms,
            checksum,
        });
    }

    tracing::debug!(
        "Indexed {} files under {} in {:?}",
        records.len(),
        directory.display(),
        start.elapsed()
    );

    Ok(DirectoryIndex { records })
}

/// Runs discovery over each immediate subdirectory, concatenating results.
fn enumerate_subdirectories(directory: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("cannot list directory '{}'", directory.display()))?;

    let mut subdirectories: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();
    subdirectories.sort();

    let mut files = Vec::new();
    for subdirectory in subdirectories {
        match discovery::enumerate(&subdirectory, extensions) {
            Ok(mut found) => files.append(&mut found),
            Err(err) => {
                tracing::warn!(
                    "Skipping subdirectory {}: {}",
                    subdirectory.display(),
                    err
                );
            }
        }
    }
    Ok(files)
}

/// Hidden directories are skipped below the requested root, and the fallback
/// pass keeps that rule even though each subdirectory starts its own walk.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
