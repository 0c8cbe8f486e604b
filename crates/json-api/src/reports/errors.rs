//! Report Errors

use salvo::http::StatusError;

use giftqr_app::domain::reports::ReportsServiceError;

use crate::errors::{backend_failure, backend_unauthorized, forbidden};

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::InvalidRange => {
            StatusError::bad_request().brief("\"from\" must not be after \"to\"")
        }
        ReportsServiceError::InvalidDate(_) => {
            StatusError::bad_request().brief("Date out of range")
        }
        ReportsServiceError::Forbidden(denied) => forbidden(&denied),
        ReportsServiceError::Unauthorized => backend_unauthorized(),
        ReportsServiceError::Backend(source) => backend_failure("report request failed", &source),
    }
}
