//! Shared status error mapping.

use salvo::http::StatusError;
use tracing::{error, warn};

use giftqr_app::{auth::AccessDenied, backend::BackendError};

/// 502 when the backend could not be reached or answered unexpectedly, 500 otherwise.
pub(crate) fn backend_failure(context: &str, source: &BackendError) -> StatusError {
    error!("{context}: {source}");

    if source.is_upstream() {
        StatusError::bad_gateway()
    } else {
        StatusError::internal_server_error()
    }
}

pub(crate) fn forbidden(denied: &AccessDenied) -> StatusError {
    warn!("{denied}");

    StatusError::forbidden().brief(denied.to_string())
}

pub(crate) fn backend_unauthorized() -> StatusError {
    warn!("backend rejected the session token");

    StatusError::unauthorized().brief("Session expired")
}
