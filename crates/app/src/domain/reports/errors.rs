//! Reports service errors.

use thiserror::Error;

use crate::{auth::AccessDenied, backend::BackendError};

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    #[error("report start date is after its end date")]
    InvalidRange,

    #[error("date out of range")]
    InvalidDate(#[source] jiff::Error),

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("not authorized by backend")]
    Unauthorized,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for ReportsServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized => Self::Unauthorized,
            other => Self::Backend(other),
        }
    }
}
