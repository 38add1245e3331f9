use std::error::Error;
use std::fmt;

use reqwest::StatusCode;

/// Classification of a failed wiki API round trip.
///
/// Every client operation collapses its failure modes into exactly one of
/// these variants before returning; callers never see raw transport errors
/// or unparsed GraphQL payloads.
#[derive(Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection refused,
    /// timeout, or a failure while reading the body).
    Request(reqwest::Error),
    /// The endpoint answered with a non-success HTTP status. The raw body
    /// is carried verbatim; no further parsing is attempted.
    Transport { status: StatusCode, body: String },
    /// The GraphQL layer reported errors, none of which signal a missing
    /// page.
    Api(Vec<String>),
    /// A success status whose payload is missing the expected fields.
    MalformedResponse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => write!(f, "request failed: {err}"),
            Self::Transport { status, body } => write!(f, "HTTP error: {status} - {body}"),
            Self::Api(messages) => write!(f, "GraphQL error: {}", messages.join("; ")),
            Self::MalformedResponse(what) => {
                write!(f, "unexpected response structure: {what}")
            }
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err)
    }
}
