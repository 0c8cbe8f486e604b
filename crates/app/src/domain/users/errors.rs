//! Users service errors.

use thiserror::Error;

use crate::{
    auth::{AccessDenied, IdentityError, Role, UserUuid},
    backend::BackendError,
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("missing required field: {0}")]
    MissingRequiredData(&'static str),

    #[error("role {0} requires a branch")]
    BranchRequired(Role),

    #[error("role {0} is not configured")]
    UnknownRole(Role),

    #[error("email is already registered")]
    AlreadyRegistered,

    #[error("branch does not exist")]
    InvalidReference,

    /// The identity exists but its profile row could not be written.
    #[error("identity {user} was created without a profile")]
    ProfileIncomplete {
        user: UserUuid,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("not authorized by backend")]
    Unauthorized,

    #[error("identity service error")]
    Identity(#[source] IdentityError),

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<IdentityError> for UsersServiceError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::AlreadyRegistered => Self::AlreadyRegistered,
            other => Self::Identity(other),
        }
    }
}

impl From<BackendError> for UsersServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized => Self::Unauthorized,
            BackendError::InvalidReference(_) => Self::InvalidReference,
            other => Self::Backend(other),
        }
    }
}
