//! Unified error handling for the BlogSpace client
//!
//! Every failure is eventually shown to the user as a transient notice, so
//! variants carry a human readable message rather than source errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error type shared by the API layer, the session store and the forms
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details")]
pub enum ClientError {
    /// No credential, or the server rejected it
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Local form validation failed
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API answered with a failure status or an error envelope
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Message suitable for a user-facing notice
    ///
    /// Server and validation messages are shown as-is; everything else
    /// collapses to a generic notice.
    pub fn notice_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Authentication(msg) | Self::NotFound(msg) => msg.clone(),
            _ => "Something went wrong !!".to_string(),
        }
    }

    /// HTTP status code associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
