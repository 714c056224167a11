//! Error handling for the gas-station admin client

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Unified error type for the admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport errors (the request never completed)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success response from the backend
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Client-side authentication state errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Local validation failures, never sent to the network
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new API error from a response status and message
    pub fn api<T: fmt::Display>(status: StatusCode, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// The HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}
