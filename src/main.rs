use codesearch_mcp::server::SearchServer;
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr to avoid interfering with MCP protocol on stdout.
    codesearch_mcp::tracing::init();

    tracing::info!("Starting codesearch-mcp MCP server");

    let server = SearchServer::new();
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
