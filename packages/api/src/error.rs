//! Error taxonomy for REST calls.

use reqwest::StatusCode;
use thiserror::Error;

/// MongoDB duplicate-key error code, reported by the backend on unique
/// constraint violations (e.g. a username that is already taken).
pub const DUPLICATE_KEY_CODE: i64 = 11000;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or body-streaming failure.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the credentials, after the refresh-and-retry.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Input rejected before sending, or a 400/422 from the server.
    #[error("{0}")]
    Validation(String),

    /// Unique constraint violated (409 or duplicate-key error code).
    #[error("{0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The session could not be persisted.
    #[error(transparent)]
    Storage(#[from] store::StoreError),
}

impl ApiError {
    /// Map a non-success response to an error variant.
    ///
    /// `path` is used for the not-found message; `body` is the raw response
    /// text, which may be JSON (`{"message": ..}`, `{"error": ..}`,
    /// `{"code": 11000}`) or plain text.
    pub fn from_status(status: StatusCode, path: &str, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        let duplicate_key = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(|c| c.as_i64())
            == Some(DUPLICATE_KEY_CODE)
            || body.contains("E11000");

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            _ if duplicate_key => ApiError::Conflict(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(message)
            }
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
