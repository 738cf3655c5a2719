//! Boundary errors and replies.
//!
//! The store never fails on "not found"; services turn absent values and zero counts into
//! an [`ApiError`] carrying its status class. [`Reply::from_result`] is the single place
//! where errors become status codes and bodies.

use mockdoc::error::DocumentStoreError;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;
pub const BAD_REQUEST: u16 = 400;
pub const UNAUTHORIZED: u16 = 401;
pub const NOT_FOUND: u16 = 404;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Failures surfaced to API callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The path identity is not a well-formed integer.
    #[error("Invalid {0} ID provided")]
    InvalidIdentity(&'static str),
    /// A required body field is missing or empty.
    #[error("{0}")]
    MissingRequiredField(String),
    /// The request body has the wrong shape.
    #[error("{0}")]
    BadRequest(String),
    /// Unknown user or failed credential check.
    #[error("Unauthorized")]
    Unauthorized,
    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Anything else. The detail is logged, never returned.
    #[error("Internal Server Error")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::InvalidIdentity(_) | ApiError::MissingRequiredField(_) | ApiError::BadRequest(_) => BAD_REQUEST,
            ApiError::Unauthorized => UNAUTHORIZED,
            ApiError::NotFound(_) => NOT_FOUND,
            ApiError::Unexpected(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}

/// Error raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

/// Status code and optional JSON body produced by a service call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Unexpected(e.to_string()))?;
        Ok(Self { status, body: Some(body) })
    }

    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self { status, body: Some(json!({ "message": message.into() })) }
    }

    pub fn no_content() -> Self {
        Self { status: NO_CONTENT, body: None }
    }

    /// Maps a service outcome to a reply.
    pub fn from_result(result: Result<Reply, ApiError>) -> Self {
        match result {
            Ok(reply) => reply,
            Err(ApiError::Unexpected(detail)) => {
                error!(%detail, "unexpected failure");
                Reply::message(INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            Err(err) => Reply::message(err.status(), err.to_string()),
        }
    }

    /// The `message` field of the body, if any.
    pub fn message_text(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }
}

/// Parses a path identity the way the routes expect: a base-10 integer, nothing else.
pub fn parse_identity(raw: &str, resource: &'static str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidIdentity(resource))
}
