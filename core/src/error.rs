//! Error types for the EAN search client.
//!
//! # Design
//! Failures fall into two classes: transport faults (the request never
//! produced a usable response) and malformed-response faults (the body did
//! not have the shape an operation expects). A well-formed response with
//! zero matches is not an error; it decodes to an empty list.
//!
//! The `try_*` methods on `EanSearch` return these errors directly. The plain
//! methods collapse every variant into the operation's "no result" value.

use thiserror::Error;

/// Errors produced while calling the EAN search service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, connect, TLS, write, or read failure.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// The JSON is valid but its top-level shape is not what the operation expects.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A product object is missing a required field or carries a bad value.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// A scalar response did not contain the requested field.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// The service reported an error of its own, e.g. an invalid token.
    #[error("service error: {0}")]
    Service(String),
}

impl ApiError {
    /// True for failures that happened before a response body was available.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::HttpStatus { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
