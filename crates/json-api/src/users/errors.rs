//! User Errors

use salvo::http::StatusError;
use tracing::error;

use giftqr_app::{auth::IdentityError, domain::users::UsersServiceError};

use crate::errors::{backend_failure, backend_unauthorized, forbidden};

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::MissingRequiredData(field) => {
            StatusError::bad_request().brief(format!("Missing required field: {field}"))
        }
        UsersServiceError::BranchRequired(role) => {
            StatusError::bad_request().brief(format!("Role {role} requires a branch"))
        }
        UsersServiceError::UnknownRole(role) => {
            error!("role {role} has no row in the roles table");

            StatusError::internal_server_error()
        }
        UsersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Branch does not exist")
        }
        UsersServiceError::AlreadyRegistered => {
            StatusError::conflict().brief("Email is already registered")
        }
        UsersServiceError::ProfileIncomplete { user, source } => {
            backend_failure(&format!("identity {user} left without a profile"), &source)
        }
        UsersServiceError::Forbidden(denied) => forbidden(&denied),
        UsersServiceError::Unauthorized => backend_unauthorized(),
        UsersServiceError::Identity(source) => {
            error!("identity service failure: {source}");

            if matches!(
                source,
                IdentityError::Http(_) | IdentityError::UnexpectedResponse(_)
            ) {
                StatusError::bad_gateway()
            } else {
                StatusError::internal_server_error()
            }
        }
        UsersServiceError::Backend(source) => backend_failure("user request failed", &source),
    }
}
