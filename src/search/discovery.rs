//! Source file discovery with chained ignore rules.
//!
//! Walks one directory tree and returns the files worth indexing, honoring
//! every ancestor's ignore file (root-most applied first, most specific
//! last) plus a permanent `node_modules` rule. Test files are dropped
//! unconditionally, regardless of ignore rules.

use anyhow::Context;
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Extensions indexed when the caller supplies no filter.
pub const DEFAULT_EXTENSIONS: &[&str] =
    &[".ts", ".tsx", ".js", ".jsx", ".py", ".java", ".cpp", ".cs"];

const IGNORE_FILE: &str = ".gitignore";

/// Enumerates indexable files under `directory`.
///
/// Ordering is extension-major: all files for the first extension before any
/// for the second, lexicographic within one extension. This keeps the result
/// deterministic across invocations for an unchanged tree.
pub fn enumerate(directory: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let root = directory
        .canonicalize()
        .with_context(|| format!("cannot resolve directory '{}'", directory.display()))?;
    let rules = build_ignore_rules(&root);
    let candidates = walk_files(&root);

    let mut files = Vec::new();
    for extension in extensions {
        for path in &candidates {
            if !matches_extension(path, extension) {
                continue;
            }
            if is_test_file(path) {
                continue;
            }
            if rules.matched_path_or_any_parents(path, false).is_ignore() {
                continue;
            }
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Collects every regular file under `root`, sorted lexicographically.
///
/// All of the walker's built-in filtering is disabled; ignore semantics come
/// from [`build_ignore_rules`] so that the ancestor chain is applied the same
/// way for every candidate. Dot-prefixed entries are skipped, matching what a
/// `dir/**/*.ext` glob would surface.
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| {
            entry.depth() == 0
                || entry
                    .file_name()
                    .to_str()
                    .map(|name| !name.starts_with('.'))
                    .unwrap_or(true)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|t| t.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                tracing::warn!("Skipping unwalkable entry under {}: {}", root.display(), err);
            }
        }
    }
    files.sort();
    files
}

/// Builds the chained ignore-rule set for `root`.
///
/// Every ancestor's ignore file is read from the filesystem root downward,
/// so a deeper file's rules (including negations) override shallower ones.
/// All patterns are matched against paths relative to `root`. An unreadable
/// ignore file or a malformed pattern is skipped; the walk never fails over
/// ignore rules.
fn build_ignore_rules(root: &Path) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);

    let mut chain: Vec<PathBuf> = root
        .ancestors()
        .map(|ancestor| ancestor.join(IGNORE_FILE))
        .collect();
    chain.reverse();

    for ignore_file in chain {
        if !ignore_file.is_file() {
            continue;
        }
        match std::fs::read_to_string(&ignore_file) {
            Ok(content) => {
                for line in content.lines() {
                    if let Err(err) = builder.add_line(Some(ignore_file.clone()), line) {
                        tracing::warn!(
                            "Skipping ignore pattern {:?} from {}: {}",
                            line,
                            ignore_file.display(),
                            err
                        );
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Skipping unreadable ignore file {}: {}",
                    ignore_file.display(),
                    err
                );
            }
        }
    }

    // Dependencies are never worth indexing, whatever the ignore files say.
    let _ = builder.add_line(None, "node_modules");

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to compile ignore rules for {}: {}", root.display(), err);
        Gitignore::empty()
    })
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(extension))
}

/// True for files that look like tests: a `.spec.` or `.test.` infix in the
/// basename, or a `__tests__` directory anywhere in the path.
fn is_test_file(path: &Path) -> bool {
    let basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");
    if basename.contains(".spec.") || basename.contains(".test.") {
        return true;
    }
    path.components()
        .any(|component| component.as_os_str() == "__tests__")
}
