//! Client for the Wiki.js GraphQL API.
//!
//! Translates each logical wiki operation into one GraphQL request (two for
//! update, which must read before it writes) and collapses every response
//! into a typed outcome before it leaves this crate.

mod client;
mod error;
mod graphql;
mod model;

pub use client::{WikiClient, WikiClientConfig};
pub use error::ClientError;
pub use model::{CreateOutcome, CreatePageRequest, Page, PageHit, UpdateOutcome};
