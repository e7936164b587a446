use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Internal,
    Unexpected,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorCode::BadRequest,
            401 | 403 => ErrorCode::Unauthorized,
            404 => ErrorCode::NotFound,
            500..=599 => ErrorCode::Internal,
            _ => ErrorCode::Unexpected,
        }
    }
}

/// Error body returned by the points API on a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<u16>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Builds the exception from a response status and raw body, preferring the
    /// structured `message` when the body parses.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(parsed) if !parsed.message.is_empty() => Self::new(status, parsed.message),
            _ if body.trim().is_empty() => Self::new(status, "empty response body"),
            _ => Self::new(status, body.trim()),
        }
    }
}
