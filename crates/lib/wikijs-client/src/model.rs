use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wiki page as returned by the `single`/`singleByPath` queries.
///
/// Fields the server leaves null stay `None`; the client never substitutes
/// values of its own. Paths are carried exactly as the server stores them,
/// leading slash included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One search hit. A projection of a page without its content, in the
/// server's relevance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHit {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub path: String,
}

/// Caller-supplied fields for a page creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    pub content: String,
    pub path: String,
    /// The remote schema requires a non-null description; the empty string
    /// stands in when the caller has none.
    #[serde(default)]
    pub description: String,
}

impl CreatePageRequest {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            path: path.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Result of a `create` mutation that reached the GraphQL layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { id: i64 },
    /// The wiki refused the creation (e.g. the path is already taken); the
    /// message is the server's own wording.
    Rejected { message: String },
}

/// Result of an `update` mutation that reached the GraphQL layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { slug: String },
    Rejected { message: String },
}
