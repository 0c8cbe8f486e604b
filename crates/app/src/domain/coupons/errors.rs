//! Coupons service errors.

use thiserror::Error;

use crate::{
    auth::AccessDenied,
    backend::BackendError,
    cards::CardError,
    domain::coupons::redemption::RedemptionRejected,
};

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon not found")]
    NotFound,

    #[error("batch not found")]
    BatchNotFound,

    #[error("batch size must be between 1 and {max}, got {requested}")]
    InvalidBatchSize { requested: u32, max: u32 },

    #[error("validity must be between 1 and {max} days, got {requested}")]
    InvalidValidity { requested: u32, max: u32 },

    #[error("face values cannot be negative")]
    NegativeFaceValue,

    #[error("unknown promotion type")]
    UnknownPromo,

    #[error("unknown issuer")]
    UnknownIssuer,

    #[error("unknown branches: {}", .0.join(", "))]
    UnknownBranches(Vec<String>),

    #[error("invoice number is required")]
    MissingInvoiceNumber,

    #[error("a branch is required to redeem coupons")]
    MissingBranch,

    #[error(transparent)]
    Rejected(#[from] RedemptionRejected),

    #[error("no readable QR code in image")]
    UnreadableCode(#[source] CardError),

    #[error("QR payload is not a coupon id: {0}")]
    InvalidPayload(String),

    #[error("expiration date out of range")]
    InvalidDate(#[source] jiff::Error),

    #[error("coupon already exists")]
    AlreadyExists,

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("not authorized by backend")]
    Unauthorized,

    #[error("background task failed")]
    Task(#[source] tokio::task::JoinError),

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for CouponsServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Conflict(_) => Self::AlreadyExists,
            BackendError::NotFound => Self::NotFound,
            BackendError::InvalidData(message) | BackendError::InvalidReference(message) => {
                Self::InvalidData(message)
            }
            BackendError::Unauthorized => Self::Unauthorized,
            other @ (BackendError::Http(_) | BackendError::Unexpected { .. }) => {
                Self::Backend(other)
            }
        }
    }
}

impl CouponsServiceError {
    /// Classify a failure of the reservation or batch write call.
    ///
    /// A 404 there means the stored function is missing, not that a coupon is.
    pub(crate) fn from_issuance(error: BackendError) -> Self {
        match error {
            BackendError::NotFound => Self::Backend(error),
            other => other.into(),
        }
    }
}
