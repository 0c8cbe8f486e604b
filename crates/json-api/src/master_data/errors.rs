//! Master Data Errors

use salvo::http::StatusError;

use giftqr_app::domain::master_data::MasterDataServiceError;

use crate::errors::{backend_failure, backend_unauthorized, forbidden};

pub(crate) fn into_status_error(error: MasterDataServiceError) -> StatusError {
    match error {
        MasterDataServiceError::AlreadyExists => {
            StatusError::conflict().brief("A record with that name already exists")
        }
        MasterDataServiceError::NotFound => StatusError::not_found(),
        MasterDataServiceError::InvalidReference => {
            StatusError::conflict().brief("Record is still in use or references a missing record")
        }
        MasterDataServiceError::MissingRequiredData(field) => {
            StatusError::bad_request().brief(format!("Missing required field: {field}"))
        }
        MasterDataServiceError::InvalidData(message) => StatusError::bad_request().brief(message),
        MasterDataServiceError::Forbidden(denied) => forbidden(&denied),
        MasterDataServiceError::Unauthorized => backend_unauthorized(),
        MasterDataServiceError::Backend(source) => {
            backend_failure("master data request failed", &source)
        }
    }
}
