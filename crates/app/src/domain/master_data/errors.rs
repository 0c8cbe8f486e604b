//! Master data service errors.

use thiserror::Error;

use crate::{auth::AccessDenied, backend::BackendError};

#[derive(Debug, Error)]
pub enum MasterDataServiceError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    /// The record is still referenced, or references a missing record.
    #[error("related resource conflict")]
    InvalidReference,

    #[error("missing required field: {0}")]
    MissingRequiredData(&'static str),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("not authorized by backend")]
    Unauthorized,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for MasterDataServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Conflict(_) => Self::AlreadyExists,
            BackendError::NotFound => Self::NotFound,
            BackendError::InvalidReference(_) => Self::InvalidReference,
            BackendError::InvalidData(message) => Self::InvalidData(message),
            BackendError::Unauthorized => Self::Unauthorized,
            other @ (BackendError::Http(_) | BackendError::Unexpected { .. }) => {
                Self::Backend(other)
            }
        }
    }
}
