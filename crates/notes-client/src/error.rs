//! Error types for the notes client, and the normalizer that turns any of them
//! into one display string.

use http::StatusCode;
use notes_core::ApiErrorBody;
use thiserror::Error;

/// Result type alias for transport-level operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while talking to the notes API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The server rejected the bearer token (401 on an authenticated call).
    #[error("session expired, please log in again")]
    Unauthenticated { body: Option<ApiErrorBody> },

    /// Any other non-2xx response.
    #[error("server error ({status})")]
    Api {
        status: StatusCode,
        body: Option<ApiErrorBody>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An update was attempted on a note without an id.
    #[error("Note ID is required for update")]
    MissingNoteId,

    /// The persisted session could not be read or written.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status of the failing response, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthenticated { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured error body sent by the server, if any.
    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Unauthenticated { body } | Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether this failure means the session is no longer valid.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// The failure's own message, independent of any server body.
    ///
    /// Plain HTTP error responses carry no message of their own; their text
    /// lives in the body or nowhere.
    fn own_message(&self) -> Option<String> {
        match self {
            Self::Api { .. } => None,
            Self::Transport(msg) if msg.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

/// Maps a failure to one human-readable string.
///
/// Precedence: field-level validation errors (joined as `field: message`,
/// with the `body.`/`query.`/`params.` prefix removed), then the server's
/// top-level message, then the failure's own message, then `fallback`.
pub fn extract_error_message(err: &ClientError, fallback: &str) -> String {
    if let Some(body) = err.body() {
        if !body.errors.is_empty() {
            return body
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field_name(), e.message))
                .collect::<Vec<_>>()
                .join(", ");
        }

        if let Some(message) = body.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }

    err.own_message().unwrap_or_else(|| fallback.to_string())
}

/// A failed store operation: the normalized message plus the underlying cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    /// Display string produced by [`extract_error_message`].
    pub message: String,
    #[source]
    pub source: ClientError,
}

impl StoreError {
    /// Normalize `source`, falling back to `fallback` when nothing better exists.
    pub fn new(source: ClientError, fallback: &str) -> Self {
        Self {
            message: extract_error_message(&source, fallback),
            source,
        }
    }

    /// Whether the operation failed because the session is no longer valid.
    pub fn is_unauthenticated(&self) -> bool {
        self.source.is_unauthenticated()
    }
}
