//! Error types for the StayBNB API client.

use serde_json::Value;
use staybnb_core::ValidationError;
use thiserror::Error;

/// Fallback message when a rejected response carries no usable message.
pub const FALLBACK_MESSAGE: &str = "API request failed";

/// The server could not be reached, or its answer could not be read.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response whose body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors surfaced by every [`crate::ApiClient`] operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or decode failure.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The server answered with a non-success status.
    #[error("request failed ({status}): {message}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or [`FALLBACK_MESSAGE`].
        message: String,
    },

    /// Input rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Whether the server rejected the session (HTTP 401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Request { status: 401, .. })
    }

    /// HTTP status for server rejections.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn unauthorized(message: &str) -> Self {
        Self::Request {
            status: 401,
            message: message.to_owned(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.into())
    }
}

/// Pick the message out of a rejected response body.
///
/// Prefers a non-empty `error` string, then `message`, then
/// [`FALLBACK_MESSAGE`]. Bodies that are not JSON objects fall back too.
pub(crate) fn rejection_message(body: &str) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_MESSAGE.to_owned();
    };

    ["error", "message"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.trim().is_empty())
        .map_or_else(|| FALLBACK_MESSAGE.to_owned(), str::to_owned)
}
