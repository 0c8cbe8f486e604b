//! Auth Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use giftqr_app::auth::{AuthServiceError, IdentityError};

use crate::errors::backend_failure;

fn upstream_or_internal(upstream: bool) -> StatusError {
    if upstream {
        StatusError::bad_gateway()
    } else {
        StatusError::internal_server_error()
    }
}

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::MissingCredentials => {
            StatusError::bad_request().brief("Email and password are required")
        }
        AuthServiceError::InvalidCredentials => {
            warn!("sign-in rejected: invalid credentials");

            StatusError::unauthorized().brief("Invalid credentials")
        }
        AuthServiceError::InvalidToken => {
            warn!("rejected invalid or expired token");

            StatusError::unauthorized().brief("Invalid or expired token")
        }
        AuthServiceError::ProfileMissing => {
            warn!("authenticated account has no profile");

            StatusError::forbidden().brief("Account has no profile assigned")
        }
        AuthServiceError::Identity(source) => {
            error!("identity service failure: {source}");

            upstream_or_internal(matches!(
                source,
                IdentityError::Http(_) | IdentityError::UnexpectedResponse(_)
            ))
        }
        AuthServiceError::Backend(source) => backend_failure("failed to load profile", &source),
    }
}
