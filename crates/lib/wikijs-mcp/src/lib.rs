//! MCP server implementation for wikijs-mcp.
//!
//! Wires the wiki client into rmcp tool handlers and exposes the MCP-facing
//! tool surface for searching, reading, and writing wiki pages.

mod format;
mod tools;
pub mod server;

use std::sync::Arc;

use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use wikijs_client::WikiClient;

const SERVER_INSTRUCTIONS: &str = r"wikijs-mcp provides MCP tools for reading and writing pages on a Wiki.js instance.

Workflow:
1. `search_wiki` finds pages matching a free-text query; hits carry page ids and paths.
2. `get_page` fetches one page, by numeric id or (with by_path=true) by its path.
3. `create_page` creates a new page at a path (e.g. /my-page).
4. `update_page` replaces a page's content. The new content fully replaces the old;
   fetch the existing content first if you need to keep any of it.

Notes:
- Page ids are numeric. Paths are passed to the wiki unchanged.
- Failures come back as readable messages, including whatever the wiki reported.
- `health` returns `ok`.";

/// MCP server wrapper around one configured wiki client.
#[derive(Clone)]
pub struct WikiMcp {
    tool_router: ToolRouter<Self>,
    client: Arc<WikiClient>,
}

impl WikiMcp {
    /// Creates a new server owning the given client.
    #[must_use]
    pub fn new(client: WikiClient) -> Self {
        Self::with_client(Arc::new(client))
    }

    /// Creates a new server using a shared client handle.
    #[must_use]
    pub fn with_client(client: Arc<WikiClient>) -> Self {
        let tool_router = Self::tool_router_core() + Self::tool_router_pages();
        Self {
            tool_router,
            client,
        }
    }

    pub(crate) fn client(&self) -> &WikiClient {
        &self.client
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl WikiMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for WikiMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
