use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wikijs_client::{ClientError, CreateOutcome, CreatePageRequest, UpdateOutcome, WikiClient};

use crate::WikiMcp;
use crate::format;

/// Parameters for searching wiki pages.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchWikiParams {
    pub query: String,
}

/// Parameters for fetching one wiki page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetPageParams {
    pub identifier: String,
    pub by_path: Option<bool>,
}

/// Parameters for replacing a page's content.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdatePageParams {
    pub page_id: String,
    pub content: String,
    pub description: Option<String>,
}

/// Parameters for creating a wiki page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreatePageParams {
    pub title: String,
    pub content: String,
    pub path: String,
    pub description: Option<String>,
}

#[tool_router(router = tool_router_pages, vis = "pub")]
impl WikiMcp {
    #[tool(description = "Search for wiki pages by free-text query. Returns matching page ids, titles, and paths.")]
    async fn search_wiki(
        &self,
        Parameters(params): Parameters<SearchWikiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(reply(run_search_wiki(self.client(), &params.query).await))
    }

    #[tool(description = "Get a wiki page's content and metadata by numeric id, or by path when by_path is true.")]
    async fn get_page(
        &self,
        Parameters(params): Parameters<GetPageParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let by_path = params.by_path.unwrap_or(false);
        Ok(reply(
            run_get_page(self.client(), &params.identifier, by_path).await,
        ))
    }

    #[tool(description = "Replace a wiki page's content by numeric id. The new content fully replaces the old; get the existing content first to avoid overwriting anything important. Optionally sets a new description.")]
    async fn update_page(
        &self,
        Parameters(params): Parameters<UpdatePageParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(reply(
            run_update_page(
                self.client(),
                &params.page_id,
                &params.content,
                params.description.as_deref(),
            )
            .await,
        ))
    }

    #[tool(description = "Create a new wiki page at a path (e.g. /my-page), with an optional description.")]
    async fn create_page(
        &self,
        Parameters(params): Parameters<CreatePageParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = CreatePageRequest::new(params.title, params.content, params.path)
            .with_description(params.description.unwrap_or_default());
        Ok(reply(run_create_page(self.client(), &request).await))
    }
}

fn reply(outcome: Result<String, String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(text) => {
            warn!(error = %text, "wiki tool call failed");
            CallToolResult::error(vec![Content::text(text)])
        }
    }
}

fn render_error(err: ClientError) -> String {
    err.to_string()
}

pub(crate) async fn run_search_wiki(client: &WikiClient, query: &str) -> Result<String, String> {
    info!(query, "tool call: search_wiki");
    let hits = client.search(query).await.map_err(render_error)?;
    Ok(format::search_results(&hits))
}

pub(crate) async fn run_get_page(
    client: &WikiClient,
    identifier: &str,
    by_path: bool,
) -> Result<String, String> {
    info!(identifier, by_path, "tool call: get_page");
    let page = if by_path {
        client.page_by_path(identifier).await
    } else {
        let id = format::parse_page_id(identifier).ok_or_else(|| {
            "when by_path is false, identifier must be a numeric page id".to_owned()
        })?;
        client.page_by_id(id).await
    };
    match page.map_err(render_error)? {
        Some(page) => Ok(format::page_block(&page)),
        None if by_path => Ok(format::page_missing_by_path(identifier)),
        None => Ok(format::page_missing_by_id(identifier)),
    }
}

pub(crate) async fn run_update_page(
    client: &WikiClient,
    page_id: &str,
    content: &str,
    description: Option<&str>,
) -> Result<String, String> {
    info!(page_id, "tool call: update_page");
    let id = format::parse_page_id(page_id)
        .ok_or_else(|| "page_id must be a numeric page id".to_owned())?;
    match client
        .update_page(id, content, description)
        .await
        .map_err(render_error)?
    {
        Some(UpdateOutcome::Updated { slug }) => Ok(format!("Page updated successfully: {slug}")),
        Some(UpdateOutcome::Rejected { message }) => {
            Err(format!("Failed to update page: {message}"))
        }
        None => Err(format::page_missing_by_id(id)),
    }
}

pub(crate) async fn run_create_page(
    client: &WikiClient,
    request: &CreatePageRequest,
) -> Result<String, String> {
    info!(title = %request.title, path = %request.path, "tool call: create_page");
    match client.create_page(request).await.map_err(render_error)? {
        CreateOutcome::Created { id } => Ok(format!("Page created successfully with ID: {id}")),
        CreateOutcome::Rejected { message } => Err(format!("Failed to create page: {message}")),
    }
}
