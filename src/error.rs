//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for codesearch-mcp operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced by the search engine to its callers.
///
/// Per-file problems (an unreadable source file, a malformed ignore file)
/// are logged and skipped during a build and never reach this taxonomy;
/// only directory-level emptiness is fatal to a call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A build found nothing indexable under the directory or its
    /// immediate subdirectories.
    #[error(
        "No indexable files found under '{}' (extensions: {})",
        directory.display(),
        extensions.join(", ")
    )]
    NoFilesFound {
        directory: PathBuf,
        extensions: Vec<String>,
    },

    /// A search ran against an index that was still empty after the
    /// implicit build attempt.
    #[error("No indexed files for '{}'", directory.display())]
    NoIndexedFiles { directory: PathBuf },
}
