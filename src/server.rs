//! MCP server exposing the engine's three operations as tools.
//!
//! The server owns one process-wide [`SearchEngine`] behind a mutex and maps
//! tool calls straight onto the engine; all formatting here is presentation
//! only and adds no search semantics.

use crate::search::{SearchEngine, SearchHit};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Parameters for the create_index tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateIndexRequest {
    /// Directory to index
    pub directory: String,
    /// File extensions to include (defaults to .ts .tsx .js .jsx .py .java .cpp .cs)
    pub extensions: Option<Vec<String>>,
}

/// Parameters for the search tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text search query
    pub query: String,
    /// Directory to search within
    pub directory: String,
    /// Maximum number of results to return (default: 10)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

/// Parameters for the get_relevant_files tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RelevantFilesRequest {
    /// Free-text search query
    pub query: String,
    /// Directory to search within
    pub directory: String,
    /// Maximum number of paths to return (default: 10)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_limit() -> Option<usize> {
    Some(10)
}

/// MCP server for keyword search over source trees.
#[derive(Clone)]
pub struct SearchServer {
    /// Process-wide engine state (directory indexes and extension filters)
    engine: Arc<Mutex<SearchEngine>>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SearchServer {
    /// Create a new SearchServer with an empty engine.
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Mutex::new(SearchEngine::new())),
            tool_router: Self::tool_router(),
        }
    }

    fn engine(&self) -> MutexGuard<'_, SearchEngine> {
        self.engine.lock().unwrap_or_else(|_poisoned| {
            tracing::error!("codesearch-mcp: Engine state corrupted, aborting");
            std::process::abort();
        })
    }

    #[tool(
        description = "Build (or fully rebuild) the keyword index for a directory. Scans matching source files, honoring ignore files and skipping tests, and replaces any previous index for that directory."
    )]
    async fn create_index(
        &self,
        Parameters(CreateIndexRequest {
            directory,
            extensions,
        }): Parameters<CreateIndexRequest>,
    ) -> Result<String, String> {
        let mut engine = self.engine();
        engine
            .create_index(Path::new(&directory), extensions.as_deref())
            .map_err(|e| format!("Failed to index '{}': {}", directory, e))?;
        Ok(format!("Indexed directory '{}'", directory))
    }

    #[tool(
        description = "Search a directory for files relevant to a free-text query. Returns a ranked file list with relevance scores. Builds the index on first use; run create_index to pick up changed files."
    )]
    async fn search(
        &self,
        Parameters(SearchRequest {
            query,
            directory,
            limit,
        }): Parameters<SearchRequest>,
    ) -> Result<String, String> {
        let hits = self
            .engine()
            .search(&query, Path::new(&directory))
            .map_err(|e| format!("Search for '{}' in '{}' failed: {}", query, directory, e))?;
        Ok(format_search_results(&hits, &query, &directory, limit))
    }

    #[tool(
        description = "Like search, but returns only the ranked file paths. Useful when the caller will read the files itself."
    )]
    async fn get_relevant_files(
        &self,
        Parameters(RelevantFilesRequest {
            query,
            directory,
            limit,
        }): Parameters<RelevantFilesRequest>,
    ) -> Result<String, String> {
        let files = self
            .engine()
            .get_relevant_files(&query, Path::new(&directory))
            .map_err(|e| format!("Search for '{}' in '{}' failed: {}", query, directory, e))?;

        if files.is_empty() {
            return Ok(no_results_message(&query, &directory));
        }

        let limit = limit.unwrap_or(10);
        let mut output = String::new();
        for file in files.iter().take(limit) {
            let _ = writeln!(output, "{}", file.display());
        }
        Ok(output)
    }
}

impl Default for SearchServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_instructions(
                "codesearch-mcp: keyword search over a source tree. Use search or \
                 get_relevant_files to find files relevant to a query; the index is built \
                 automatically on first use and kept in memory for the process lifetime. \
                 Use create_index to rebuild after files change.",
            )
    }
}

/// Format ranked hits into a readable listing for the calling agent.
fn format_search_results(
    hits: &[SearchHit],
    query: &str,
    directory: &str,
    limit: Option<usize>,
) -> String {
    if hits.is_empty() {
        return no_results_message(query, directory);
    }

    let limit = limit.unwrap_or(10);
    let max_score = hits.first().map(|hit| hit.similarity_score).unwrap_or(1.0);

    let mut output = format!("Search results for '{}' in '{}':\n\n", query, directory);
    for hit in hits.iter().take(limit) {
        let relevance = ((hit.similarity_score / max_score) * 100.0).round() as u8;
        let _ = writeln!(
            output,
            "{}. {} (score {:.4}, relevance: {}%)",
            hit.rank,
            hit.file.display(),
            hit.similarity_score,
            relevance
        );
        if let Some(line) = snippet_line(&hit.code, query) {
            let _ = writeln!(output, "   {}", line.trim());
        }
        output.push('\n');
    }
    output
}

fn no_results_message(query: &str, directory: &str) -> String {
    format!(
        "No results found for '{}' in '{}'.\n\n\
         Search tips:\n\
         • Try a shorter or more general term\n\
         • Query tokens shorter than three characters are ignored\n\
         • Run create_index again if files changed since the last build\n",
        query, directory
    )
}

/// First line of the file containing a query token, or the first non-empty
/// line when nothing matches (fallback-mode hits may match only substrings).
fn snippet_line<'a>(code: &'a str, query: &str) -> Option<&'a str> {
    let tokens = crate::search::extract::tokenize(query);
    code.lines()
        .find(|line| {
            let lowered = line.to_lowercase();
            tokens.iter().any(|token| lowered.contains(token.as_str()))
        })
        .or_else(|| code.lines().find(|line| !line.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::path::PathBuf;

    fn hit(rank: usize, file: &str, score: f64, code: &str) -> SearchHit {
        SearchHit {
            file: PathBuf::from(file),
            code: code.to_string(),
            similarity_score: score,
            rank,
        }
    }

    #[test]
    fn formats_ranked_results_with_relative_relevance() {
        let hits = vec![
            hit(1, "src/user.ts", 0.12, "class UserService {}"),
            hit(2, "src/other.ts", 0.06, "let user = load()"),
        ];
        let output = format_search_results(&hits, "userservice", "/tmp/app", None);
        check!(output.contains("1. src/user.ts"));
        check!(output.contains("relevance: 100%"));
        check!(output.contains("2. src/other.ts"));
        check!(output.contains("relevance: 50%"));
    }

    #[test]
    fn empty_hits_produce_guidance() {
        let output = format_search_results(&[], "nothing", "/tmp/app", None);
        check!(output.contains("No results found for 'nothing'"));
    }

    #[test]
    fn snippet_prefers_matching_line() {
        let code = "import x from 'y'\nclass PaymentGateway {}\n";
        check!(snippet_line(code, "payment") == Some("class PaymentGateway {}"));
    }

    #[test]
    fn limit_caps_the_listing() {
        let hits: Vec<SearchHit> = (1..=5)
            .map(|i| hit(i, &format!("f{}.ts", i), 0.1, "alpha"))
            .collect();
        let output = format_search_results(&hits, "alpha", "/tmp/app", Some(2));
        check!(output.contains("1. f1.ts"));
        check!(output.contains("2. f2.ts"));
        check!(!output.contains("3. f3.ts"));
    }
}
