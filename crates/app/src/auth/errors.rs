//! Auth service errors.

use thiserror::Error;

use crate::{auth::IdentityError, backend::BackendError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    /// Authenticated, but no usable profile (role) is assigned.
    #[error("account has no profile assigned")]
    ProfileMissing,

    #[error("identity service error")]
    Identity(#[source] IdentityError),

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<IdentityError> for AuthServiceError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::InvalidCredentials => Self::InvalidCredentials,
            IdentityError::InvalidToken => Self::InvalidToken,
            other => Self::Identity(other),
        }
    }
}

impl From<BackendError> for AuthServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized => Self::InvalidToken,
            other => Self::Backend(other),
        }
    }
}
