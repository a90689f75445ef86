//! Stream error types and handling

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can end a chat stream, or prevent one from starting.
///
/// Per-frame decode and normalization failures are absorbed inside the
/// session and never surface here; a `StreamError` always describes a
/// session-terminal condition.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The client or its configuration could not be constructed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configured endpoint could not be combined into a valid URL
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The connection could not be established (the session never opened)
    #[error("failed to open chat stream: {0}")]
    Connect(#[source] reqwest::Error),

    /// The transport failed while the stream was logically open
    #[error("chat stream transport failed: {0}")]
    Transport(String),

    /// The backend signaled an application-level failure
    #[error("backend error: {0}")]
    Business(ErrorRecord),
}

/// Application-defined error record carried by a `business-error` event.
///
/// The payload is not guaranteed to be well-formed; undecodable payloads
/// are replaced with [`ErrorRecord::unparseable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Backend error code, when one was provided
    #[serde(default)]
    pub code: Option<i64>,

    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

impl ErrorRecord {
    /// Generic substitute for a `business-error` payload that failed to
    /// decode.
    pub fn unparseable() -> Self {
        ErrorRecord {
            code: None,
            message: "the server returned an unparseable error".to_string(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
