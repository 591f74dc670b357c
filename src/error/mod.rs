//! Errors raised by the harness itself.
//!
//! A misbehaving service under test never produces an [`Error`]; its
//! mismatches are recorded as [`Failure`](crate::testing::Failure) data. An
//! `Error` only means the harness could not execute a request at all, and the
//! runner records it against the case that attempted the request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Failed to serialize identity: {0}")]
    Identity(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Send(#[source] reqwest::Error),

    #[error("Failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Cannot send `{0}` with its path kept verbatim: only http:// is supported")]
    UnsupportedScheme(String),

    #[error("Failed to build request: {0}")]
    InvalidRequest(#[source] http::Error),

    #[error("Request failed: {0}")]
    VerbatimSend(#[source] hyper_util::client::legacy::Error),

    #[error("Failed to read response: {0}")]
    VerbatimBody(#[source] hyper::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
