//! Client error types.
//!
//! Server failures arrive as `{"error": "...", "code": "..."}` with an HTTP
//! status; [`ClientError::from_response`] turns that pair back into one
//! variant per category the server distinguishes.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something we could not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No session, or the server rejected the token. Clears the session.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

impl ClientError {
    /// Classify a non-success response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let (message, code) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => (parsed.error, parsed.code),
            Err(_) if body.trim().is_empty() => (status.to_string(), None),
            Err(_) => (body.trim().to_string(), None),
        };

        match code.as_deref() {
            Some("SERVER_MISCONFIGURED") => return Self::ServerMisconfigured(message),
            Some("UPSTREAM_FAILURE") => return Self::UpstreamFailure(message),
            _ => {}
        }

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::BadRequest(message)
            }
            StatusCode::UNAUTHORIZED => Self::Unauthenticated(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::Internal(message),
        }
    }

    /// Whether this error should end the local session.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}
