//! Stateless-per-call client for the Wiki.js GraphQL API.

use std::time::Duration;

use reqwest::header;
use serde_json::{Value, json};
use tracing::{debug, info};
use url::Url;

use crate::error::ClientError;
use crate::graphql::{self, GraphqlRequest, Reply, ResponseResult};
use crate::model::{CreateOutcome, CreatePageRequest, Page, PageHit, UpdateOutcome};

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable connection settings for one wiki endpoint.
#[derive(Debug, Clone)]
pub struct WikiClientConfig {
    pub base_url: Url,
    pub api_token: String,
    pub locale: String,
    pub request_timeout: Duration,
}

impl WikiClientConfig {
    #[must_use]
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: api_token.into(),
            locale: DEFAULT_LOCALE.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Client for one Wiki.js instance.
///
/// Every operation issues exactly one GraphQL request (`update_page` issues
/// a read first) over its own short-lived HTTP connection; nothing is
/// cached or pooled between calls.
#[derive(Debug, Clone)]
pub struct WikiClient {
    endpoint: Url,
    config: WikiClientConfig,
}

impl WikiClient {
    #[must_use]
    pub fn new(config: WikiClientConfig) -> Self {
        // The GraphQL endpoint lives at <base>/graphql, trailing slash or not.
        let mut endpoint = config.base_url.clone();
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments.pop_if_empty().push("graphql");
        }
        Self { endpoint, config }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    /// Runs a full-text search. No pagination; whatever the server returns
    /// in one response, in its own relevance order.
    ///
    /// # Errors
    /// Returns a classified [`ClientError`] for transport, API, or payload
    /// failures.
    pub async fn search(&self, query: &str) -> Result<Vec<PageHit>, ClientError> {
        info!(query, "searching wiki pages");
        let reply = self
            .execute(graphql::SEARCH_QUERY, json!({ "query": query }))
            .await?;
        let Reply::Data(data) = reply else {
            return Ok(Vec::new());
        };
        let results = graphql::descend(&data, &["pages", "search", "results"])?;
        serde_json::from_value(results.clone())
            .map_err(|err| ClientError::MalformedResponse(format!("search results: {err}")))
    }

    /// Fetches a page by its numeric id. `Ok(None)` means the wiki has no
    /// such page, signaled either by error code 6003 or by a null result.
    ///
    /// # Errors
    /// Returns a classified [`ClientError`] for transport, API, or payload
    /// failures.
    pub async fn page_by_id(&self, id: i64) -> Result<Option<Page>, ClientError> {
        info!(id, "fetching wiki page by id");
        let reply = self
            .execute(graphql::SINGLE_QUERY, json!({ "id": id }))
            .await?;
        Self::extract_page(reply, "single")
    }

    /// Fetches a page by its path, in the configured locale. The path is
    /// passed to the server unchanged; no local canonicalization.
    ///
    /// # Errors
    /// Returns a classified [`ClientError`] for transport, API, or payload
    /// failures.
    pub async fn page_by_path(&self, path: &str) -> Result<Option<Page>, ClientError> {
        info!(path, "fetching wiki page by path");
        let reply = self
            .execute(
                graphql::SINGLE_BY_PATH_QUERY,
                json!({ "path": path, "locale": self.config.locale }),
            )
            .await?;
        Self::extract_page(reply, "singleByPath")
    }

    /// Creates a page. The mutation always carries the full variable set
    /// the remote schema requires, defaults included, even for fields no
    /// caller supplies.
    ///
    /// # Errors
    /// Returns a classified [`ClientError`] for transport, API, or payload
    /// failures.
    pub async fn create_page(
        &self,
        request: &CreatePageRequest,
    ) -> Result<CreateOutcome, ClientError> {
        info!(title = %request.title, path = %request.path, "creating wiki page");
        let variables = json!({
            "title": request.title,
            "content": request.content,
            "description": request.description,
            "editor": "markdown",
            "locale": self.config.locale,
            "isPrivate": false,
            "isPublished": true,
            "path": request.path,
            "tags": [],
            "scriptCss": "",
            "scriptJs": "",
            "publishStartDate": null,
            "publishEndDate": null,
        });

        let reply = self.execute(graphql::CREATE_MUTATION, variables).await?;
        let Reply::Data(data) = reply else {
            return Err(ClientError::MalformedResponse(
                "not-found reply to a create mutation".to_owned(),
            ));
        };
        let result = Self::mutation_result(&data, "create")?;
        if result.succeeded {
            let id = graphql::descend(&data, &["pages", "create", "page", "id"])?
                .as_i64()
                .ok_or_else(|| ClientError::MalformedResponse("created page id".to_owned()))?;
            info!(id, "wiki page created");
            Ok(CreateOutcome::Created { id })
        } else {
            let message = result.message.unwrap_or_default();
            info!(message = %message, "wiki refused page creation");
            Ok(CreateOutcome::Rejected { message })
        }
    }

    /// Replaces a page's content. The remote schema requires the full
    /// record on update, so the page is read first and the new `content`
    /// (plus `description`, only when supplied) is merged over the stored
    /// `title`, `description`, and `path`. When the read fails or finds no
    /// page, the mutation is never issued. `Ok(None)` means the page does
    /// not exist.
    ///
    /// The read-merge-write sequence is not atomic; concurrent writers to
    /// the same page can race.
    ///
    /// # Errors
    /// Returns a classified [`ClientError`] for transport, API, or payload
    /// failures, from either the read or the write.
    pub async fn update_page(
        &self,
        id: i64,
        content: &str,
        description: Option<&str>,
    ) -> Result<Option<UpdateOutcome>, ClientError> {
        info!(id, "updating wiki page");
        let Some(page) = self.page_by_id(id).await? else {
            return Ok(None);
        };

        let description = description.map(str::to_owned).or(page.description);
        let variables = json!({
            "id": id,
            "title": page.title,
            "content": content,
            "description": description,
            "editor": "markdown",
            "locale": self.config.locale,
            "isPrivate": false,
            "isPublished": true,
            "path": page.path,
            "tags": [],
        });

        let reply = self.execute(graphql::UPDATE_MUTATION, variables).await?;
        let Reply::Data(data) = reply else {
            // Deleted between the read and the write.
            return Ok(None);
        };
        let result = Self::mutation_result(&data, "update")?;
        if result.succeeded {
            let slug = result.slug.unwrap_or_default();
            info!(slug = %slug, "wiki page updated");
            Ok(Some(UpdateOutcome::Updated { slug }))
        } else {
            let message = result.message.unwrap_or_default();
            info!(message = %message, "wiki refused page update");
            Ok(Some(UpdateOutcome::Rejected { message }))
        }
    }

    /// Sends one GraphQL document and classifies the reply. A fresh HTTP
    /// client is built per call and dropped on every exit path.
    async fn execute(&self, document: &str, variables: Value) -> Result<Reply, ClientError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(self.config.request_timeout)
            .build()?;
        let response = http
            .post(self.endpoint.clone())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_token),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .json(&GraphqlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "wiki API reply");
        graphql::classify(status, &body)
    }

    fn extract_page(reply: Reply, field: &str) -> Result<Option<Page>, ClientError> {
        let Reply::Data(data) = reply else {
            return Ok(None);
        };
        let page = graphql::descend(&data, &["pages", field])?;
        serde_json::from_value(page.clone())
            .map_err(|err| ClientError::MalformedResponse(format!("page payload: {err}")))
    }

    fn mutation_result(data: &Value, field: &str) -> Result<ResponseResult, ClientError> {
        let result = graphql::descend(data, &["pages", field, "responseResult"])?;
        serde_json::from_value(result.clone())
            .map_err(|err| ClientError::MalformedResponse(format!("responseResult: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> WikiClient {
        let base_url: Url = base.parse().expect("valid base url");
        WikiClient::new(WikiClientConfig::new(base_url, "token"))
    }

    #[test]
    fn endpoint_is_joined_under_the_base_path() {
        assert_eq!(
            client_for("https://wiki.example.com").endpoint.as_str(),
            "https://wiki.example.com/graphql"
        );
        assert_eq!(
            client_for("https://example.com/wiki").endpoint.as_str(),
            "https://example.com/wiki/graphql"
        );
        assert_eq!(
            client_for("https://example.com/wiki/").endpoint.as_str(),
            "https://example.com/wiki/graphql"
        );
    }

    #[test]
    fn locale_defaults_to_en() {
        assert_eq!(client_for("https://wiki.example.com").locale(), "en");
    }
}
