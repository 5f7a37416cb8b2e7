//! Keyword search over source trees.
//!
//! This module holds the whole engine: file discovery, keyword extraction,
//! per-directory index construction, dual-mode scoring, and the facade that
//! ties them together.

pub mod discovery;
pub mod engine;
pub mod extract;
pub mod index;
pub mod scoring;

pub use discovery::DEFAULT_EXTENSIONS;
pub use engine::{SearchEngine, SearchHit};
pub use index::{DirectoryIndex, FileRecord};
pub use scoring::ScoreMode;
