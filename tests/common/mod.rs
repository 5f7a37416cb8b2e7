//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Tests build indexes over isolated temp-directory source trees. Each test
//! gets:
//! - A fresh temporary directory populated with sample source files
//! - Its own `SearchEngine` with empty in-memory state
//!
//! Tests using these fixtures can run in parallel without interference.
//!
//! # Available Fixtures
//!
//! - `sample_project`: A small TypeScript-flavored tree with classes,
//!   functions, tests, and a node_modules directory (recommended)
//!
//! [`TempWorkspace`] provides a reusable temp directory abstraction for any
//! test that needs filesystem isolation.

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped. Use this as a building block
/// for test fixtures that need filesystem isolation.
///
/// # Example
///
/// ```ignore
/// let workspace = TempWorkspace::new();
/// workspace.create_file("src/user.ts", "class UserService {}");
/// assert!(workspace.path().join("src/user.ts").exists());
/// ```
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Creates a file with raw bytes, for content that is not valid UTF-8.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file_bytes(&self, path: &str, content: &[u8]) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Removes a file within this workspace.
    ///
    /// # Panics
    /// Panics if removal fails.
    pub fn remove_file(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::remove_file(&full_path)
            .unwrap_or_else(|e| panic!("Failed to remove file '{}': {}", path, e));
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A small TypeScript-flavored project tree.
///
/// Layout:
/// - `src/user.ts` declares `class UserService`
/// - `src/email.ts` declares `class EmailNotifier`
/// - `src/math.ts` declares `function add`
/// - `src/user.test.ts` and `src/__tests__/helpers.ts` are test files
/// - `node_modules/pkg/index.js` must never be indexed
#[fixture]
pub fn sample_project() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.create_file(
        "src/user.ts",
        "class UserService {\n  findUser(id) {\n    return lookup(id)\n  }\n}\n",
    );
    workspace.create_file(
        "src/email.ts",
        "class EmailNotifier {\n  notify(address) {\n    send(address)\n  }\n}\n",
    );
    workspace.create_file(
        "src/math.ts",
        "function add(a, b) {\n  return a + b\n}\n",
    );
    workspace.create_file("src/user.test.ts", "class UserService {}\n");
    workspace.create_file("src/__tests__/helpers.ts", "function makeUser() {}\n");
    workspace.create_file("node_modules/pkg/index.js", "class UserService {}\n");
    workspace
}
