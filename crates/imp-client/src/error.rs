//! Error types for remote calls.

use thiserror::Error;

/// Errors raised by the backend and ticket clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text from the response body, or a generic status line.
        message: String,
    },

    /// The server answered 2xx but flagged the call as failed.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A resource that was asked for by id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Reading a file to upload failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns a user-friendly error message suitable for notifications.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => {
                "Could not reach the import service. Please check your connection."
            }
            Self::Timeout => "The import service did not answer in time. Please try again.",
            Self::Status { status, .. } if *status >= 500 => {
                "The import service reported an internal error."
            }
            Self::Status { status: 401, .. } => "You are not authorized to perform this action.",
            Self::Status { status: 403, .. } => "This action is forbidden.",
            Self::Status { message, .. } | Self::Rejected(message) => message.as_str(),
            Self::NotFound(_) => "The requested item could not be found.",
            Self::Io(_) => "The file could not be read.",
            Self::JsonParse(_) | Self::Config(_) => "An unexpected error occurred.",
        }
    }

    /// Message text as reported by the server, when there is one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::JsonParse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
