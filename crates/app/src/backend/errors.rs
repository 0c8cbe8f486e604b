//! Backend errors.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport, timeout or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request not authorized by backend")]
    Unauthorized,

    #[error("resource not found")]
    NotFound,

    #[error("row already exists: {0}")]
    Conflict(String),

    #[error("related resource not found: {0}")]
    InvalidReference(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unexpected response from backend ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

/// Error body returned by the tabular API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl BackendError {
    /// Classify a non-success response by its status and Postgres error code.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.unwrap_or_else(|| body.to_string());

        match (status, parsed.code.as_deref()) {
            (_, Some("23505")) | (409, None) => Self::Conflict(message),
            (_, Some("23503")) => Self::InvalidReference(message),
            (_, Some("23502" | "23514" | "22P02" | "22007" | "22003")) => {
                Self::InvalidData(message)
            }
            (401 | 403, _) | (_, Some("42501" | "PGRST301" | "PGRST302")) => Self::Unauthorized,
            (404, _) | (_, Some("PGRST116")) => Self::NotFound,
            (400, _) => Self::InvalidData(message),
            _ => Self::Unexpected { status, message },
        }
    }

    /// Whether the failure originated upstream rather than in the request.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Unexpected { .. })
    }
}
