//! Error types

use serde_json::Value;
use thiserror::Error;

/// Result type for registry and configuration operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Registry and configuration errors
#[derive(Debug, Error)]
pub enum Error {
    /// Two clients in one configuration share a type name
    #[error("Duplicate client type: {0}")]
    DuplicateClient(String),
    /// No client is registered under this type name
    #[error("Unknown client type: {0}")]
    UnknownClient(String),
    /// Configuration is structurally valid but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration source could not be loaded
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// JSON error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Transport-level HTTP errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Request could not be built from the options
    #[error("Request build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_connect() {
            HttpError::Connection(err.to_string())
        } else if err.is_decode() {
            HttpError::Serialization(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

/// A response with status >= 400, normalized into an error value
///
/// These are expected failures reported by the remote service, as opposed to
/// [`HttpError`] which covers failures to talk to it at all.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Operational error ({status_code}): {body}")]
pub struct OperationalError {
    /// HTTP status code of the response
    pub status_code: u16,
    /// Response body
    pub body: Value,
}

impl OperationalError {
    /// Always `true`; operational errors are recoverable by the caller
    pub fn is_operational(&self) -> bool {
        true
    }
}

/// Failure of a single dispatched request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The service answered with status >= 400
    #[error(transparent)]
    Operational(#[from] OperationalError),
    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl RequestError {
    /// Whether this is an HTTP-level failure rather than a transport failure
    pub fn is_operational(&self) -> bool {
        matches!(self, RequestError::Operational(_))
    }

    /// Response body of an operational error
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Operational(err) => Some(&err.body),
            RequestError::Transport(_) => None,
        }
    }

    /// Response status code of an operational error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::Operational(err) => Some(err.status_code),
            RequestError::Transport(_) => None,
        }
    }
}
