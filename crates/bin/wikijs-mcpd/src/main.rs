//! Daemon entry point for the Wiki.js MCP server.
//!
//! Loads configuration from the environment, builds the wiki client, and
//! serves the MCP protocol over stdio or streamable HTTP.

mod config;

use std::sync::Arc;

use tracing::info;
use wikijs_client::{WikiClient, WikiClientConfig};
use wikijs_mcp::server::{self, McpHttpServerConfig};

use crate::config::WikiMcpdConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Log to stderr; stdout carries MCP JSON-RPC.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = WikiMcpdConfig::from_args()?;
    let client_config = WikiClientConfig::new(config.wiki_url.clone(), config.api_token.clone())
        .with_locale(config.locale.clone())
        .with_request_timeout(config.request_timeout);
    let client = Arc::new(WikiClient::new(client_config));

    info!(wiki_url = %config.wiki_url, "starting Wiki.js MCP server");

    if config.serve_http {
        server::serve_streamable_http(client, McpHttpServerConfig::new(config.mcp_http_addr))
            .await?;
    } else {
        server::serve_stdio(client).await?;
    }
    Ok(())
}
