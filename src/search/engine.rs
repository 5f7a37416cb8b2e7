//! The engine facade: owns every directory's index and answers queries.
//!
//! One `SearchEngine` is constructed per process and passed by reference to
//! whatever hosts it; there is no ambient global state. Indexes live for the
//! engine's lifetime — entries are replaced wholesale on rebuild and never
//! evicted.

use anyhow::Context;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::discovery::DEFAULT_EXTENSIONS;
use super::index::{self, DirectoryIndex};
use super::scoring;
use crate::error::{EngineError, Result};

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub file: PathBuf,
    /// Full text of the file at index time.
    pub code: String,
    pub similarity_score: f64,
    /// 1-based position in the ranking.
    pub rank: usize,
}

/// Per-process keyword search engine over source trees.
#[derive(Debug, Default)]
pub struct SearchEngine {
    /// Normalized directory to its indexed snapshot.
    indexes: HashMap<PathBuf, DirectoryIndex>,
    /// Normalized directory to the extension filter its index was built with.
    extensions: HashMap<PathBuf, Vec<String>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index for `directory`, fully replacing any existing entry.
    ///
    /// Fails with [`EngineError::NoFilesFound`] when nothing indexable exists
    /// under the directory or its immediate subdirectories.
    pub fn create_index(&mut self, directory: &Path, extensions: Option<&[String]>) -> Result<()> {
        let key = normalize_directory(directory)?;
        let extensions = normalize_extensions(extensions);

        let built = index::build(&key, &extensions)?;
        tracing::info!("Indexed {} files under {}", built.len(), key.display());

        // Wholesale replacement; nothing from a previous build survives.
        self.indexes.insert(key.clone(), built);
        self.extensions.insert(key, extensions);
        Ok(())
    }

    /// Ranks the directory's files against `query`, best first.
    ///
    /// A missing index is built lazily with the remembered extension filter
    /// (or the defaults); an existing index is never rebuilt here. Fails with
    /// [`EngineError::NoIndexedFiles`] when the index is still empty after
    /// the implicit attempt. A query with no usable tokens returns an empty
    /// list, not an error.
    pub fn search(&mut self, query: &str, directory: &Path) -> Result<Vec<SearchHit>> {
        let key = normalize_directory(directory)?;

        if !self.indexes.contains_key(&key) {
            let extensions = self
                .extensions
                .get(&key)
                .cloned()
                .unwrap_or_else(|| normalize_extensions(None));
            match index::build(&key, &extensions) {
                Ok(built) => {
                    tracing::debug!(
                        "Implicitly indexed {} files under {}",
                        built.len(),
                        key.display()
                    );
                    self.indexes.insert(key.clone(), built);
                    self.extensions.insert(key.clone(), extensions);
                }
                Err(err) => {
                    tracing::warn!("Implicit index build for {} failed: {}", key.display(), err);
                }
            }
        }

        let dir_index = self
            .indexes
            .get(&key)
            .filter(|dir_index| !dir_index.is_empty())
            .ok_or(EngineError::NoIndexedFiles {
                directory: key.clone(),
            })?;

        let mut scored = scoring::score(query, dir_index);
        // Stable sort: equal scores keep discovery order, so a rerun without
        // reindexing reproduces identical output.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let hits = scored
            .into_iter()
            .enumerate()
            .map(|(position, scored)| {
                let record = &dir_index.records[scored.record];
                SearchHit {
                    file: record.path.clone(),
                    code: record.text.clone(),
                    similarity_score: scored.score,
                    rank: position + 1,
                }
            })
            .collect();
        Ok(hits)
    }

    /// Same ranking as [`Self::search`], projected to file paths.
    pub fn get_relevant_files(&mut self, query: &str, directory: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .search(query, directory)?
            .into_iter()
            .map(|hit| hit.file)
            .collect())
    }
}

/// Canonical key for a directory.
///
/// Idempotent: any relative or absolute spelling of the same physical
/// directory maps to the identical key.
fn normalize_directory(directory: &Path) -> Result<PathBuf> {
    directory
        .canonicalize()
        .with_context(|| format!("cannot resolve directory '{}'", directory.display()))
}

/// Resolves the extension filter for a build: the caller's list with a
/// leading dot enforced, or the defaults when none was given.
fn normalize_extensions(extensions: Option<&[String]>) -> Vec<String> {
    match extensions {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|ext| {
                if ext.starts_with('.') {
                    ext.clone()
                } else {
                    format!(".{ext}")
                }
            })
            .collect(),
        _ => DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
    }
}
