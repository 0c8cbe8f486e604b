//! Coupon Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use giftqr_app::domain::coupons::{CouponsServiceError, redemption::RedemptionRejected};

use crate::{
    errors::{backend_failure, backend_unauthorized, forbidden},
    observability::record_redemption,
};

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::BatchNotFound => StatusError::not_found().brief("Batch not found"),
        CouponsServiceError::Rejected(rejected) => rejection(&rejected),
        error @ (CouponsServiceError::InvalidBatchSize { .. }
        | CouponsServiceError::InvalidValidity { .. }
        | CouponsServiceError::NegativeFaceValue
        | CouponsServiceError::UnknownPromo
        | CouponsServiceError::UnknownIssuer
        | CouponsServiceError::UnknownBranches(_)
        | CouponsServiceError::MissingInvoiceNumber
        | CouponsServiceError::MissingBranch
        | CouponsServiceError::InvalidPayload(_)
        | CouponsServiceError::InvalidDate(_)) => {
            StatusError::bad_request().brief(error.to_string())
        }
        CouponsServiceError::UnreadableCode(source) => {
            warn!("unreadable coupon image: {source}");

            StatusError::bad_request().brief("No readable QR code in image")
        }
        CouponsServiceError::InvalidData(message) => {
            warn!("backend rejected coupon data: {message}");

            StatusError::bad_request().brief("Invalid data")
        }
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon already exists")
        }
        CouponsServiceError::Forbidden(denied) => forbidden(&denied),
        CouponsServiceError::Unauthorized => backend_unauthorized(),
        CouponsServiceError::Task(source) => {
            error!("coupon task failed: {source}");

            StatusError::internal_server_error()
        }
        CouponsServiceError::Backend(source) => backend_failure("coupon request failed", &source),
    }
}

fn rejection(rejected: &RedemptionRejected) -> StatusError {
    for reason in &rejected.reasons {
        record_redemption(reason.label());
    }

    let brief = rejected
        .reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    StatusError::conflict().brief(brief)
}
