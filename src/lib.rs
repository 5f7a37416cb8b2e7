//! codesearch-mcp - per-process keyword search over source trees.
//!
//! The engine scans a directory, builds an in-memory term-frequency index
//! per file, and answers free-text queries with a ranked file list. It is
//! aimed at developer tooling and LLM assistants that need "find relevant
//! files for this query" without a persistent search backend.

pub mod error;
pub mod search;
pub mod server;
pub mod tracing;

pub use error::EngineError;
pub use search::{SearchEngine, SearchHit};
