//! GraphQL documents and response classification for the Wiki.js API.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Error code Wiki.js attaches to `extensions.exception.code` when a
/// requested page does not exist. Distinguished from every other error
/// class.
pub(crate) const PAGE_NOT_FOUND_CODE: i64 = 6003;

pub(crate) const SEARCH_QUERY: &str = r"
query ($query: String!) {
    pages {
        search(query: $query) {
            results {
                id
                title
                description
                path
            }
        }
    }
}";

pub(crate) const SINGLE_QUERY: &str = r"
query ($id: Int!) {
    pages {
        single(id: $id) {
            id
            title
            description
            content
            path
            updatedAt
        }
    }
}";

pub(crate) const SINGLE_BY_PATH_QUERY: &str = r"
query ($path: String!, $locale: String!) {
    pages {
        singleByPath(path: $path, locale: $locale) {
            id
            title
            description
            content
            path
            updatedAt
        }
    }
}";

pub(crate) const CREATE_MUTATION: &str = r"
mutation (
    $title: String!
    $content: String!
    $description: String!
    $editor: String!
    $locale: String!
    $isPrivate: Boolean!
    $isPublished: Boolean!
    $path: String!
    $tags: [String]!
    $scriptCss: String
    $scriptJs: String
    $publishStartDate: Date
    $publishEndDate: Date
) {
    pages {
        create(
            title: $title
            content: $content
            description: $description
            editor: $editor
            locale: $locale
            isPrivate: $isPrivate
            isPublished: $isPublished
            path: $path
            tags: $tags
            scriptCss: $scriptCss
            scriptJs: $scriptJs
            publishStartDate: $publishStartDate
            publishEndDate: $publishEndDate
        ) {
            responseResult {
                succeeded
                slug
                message
            }
            page {
                id
                title
                description
                path
            }
        }
    }
}";

pub(crate) const UPDATE_MUTATION: &str = r"
mutation (
    $id: Int!
    $title: String
    $content: String
    $description: String
    $editor: String
    $locale: String
    $isPrivate: Boolean
    $isPublished: Boolean
    $path: String
    $tags: [String]
) {
    pages {
        update(
            id: $id
            title: $title
            content: $content
            description: $description
            editor: $editor
            locale: $locale
            isPrivate: $isPrivate
            isPublished: $isPublished
            path: $path
            tags: $tags
        ) {
            responseResult {
                succeeded
                slug
                message
            }
        }
    }
}";

/// One GraphQL request body: a fixed document plus its variables.
#[derive(Debug, Serialize)]
pub(crate) struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    exception: Option<ErrorException>,
}

#[derive(Debug, Deserialize)]
struct ErrorException {
    #[serde(default)]
    code: Option<i64>,
}

impl GraphqlError {
    fn is_not_found(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.exception.as_ref())
            .and_then(|exception| exception.code)
            == Some(PAGE_NOT_FOUND_CODE)
    }
}

/// A GraphQL reply that survived transport and error-list classification.
#[derive(Debug)]
pub(crate) enum Reply {
    Data(Value),
    /// The error list carried the not-found sentinel.
    NotFound,
}

/// Collapses one HTTP reply into data, not-found, or a classified error.
///
/// Order is fixed: transport status first, then the GraphQL error list,
/// and only then the payload. A body that fails to parse or lacks `data`
/// is malformed, never a panic.
pub(crate) fn classify(status: StatusCode, body: &str) -> Result<Reply, ClientError> {
    if !status.is_success() {
        return Err(ClientError::Transport {
            status,
            body: body.to_owned(),
        });
    }

    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|err| ClientError::MalformedResponse(format!("invalid JSON body: {err}")))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        if errors.iter().any(GraphqlError::is_not_found) {
            return Ok(Reply::NotFound);
        }
        let messages = errors
            .into_iter()
            .map(|error| {
                error
                    .message
                    .unwrap_or_else(|| "unknown GraphQL error".to_owned())
            })
            .collect();
        return Err(ClientError::Api(messages));
    }

    match envelope.data {
        Some(data) => Ok(Reply::Data(data)),
        None => Err(ClientError::MalformedResponse(
            "missing `data` field".to_owned(),
        )),
    }
}

/// Walks `data` down a path of object keys, reporting the first segment
/// that is absent. A JSON null at the leaf is returned as-is so callers can
/// tell "present but null" from "missing".
pub(crate) fn descend<'a>(data: &'a Value, path: &[&str]) -> Result<&'a Value, ClientError> {
    let mut cursor = data;
    for segment in path {
        match cursor.get(segment) {
            Some(next) => cursor = next,
            None => {
                return Err(ClientError::MalformedResponse(format!(
                    "missing field `{segment}`"
                )));
            }
        }
    }
    Ok(cursor)
}

/// The `responseResult` block Wiki.js returns from every mutation.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseResult {
    pub succeeded: bool,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
