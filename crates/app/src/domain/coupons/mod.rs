//! Coupons: issuance, lookup and redemption

pub mod data;
pub mod errors;
pub mod issuance;
pub mod models;
pub(crate) mod records;
pub mod redemption;
mod repository;
pub mod service;

pub use errors::CouponsServiceError;
pub use records::{InconsistentRecord, NewBatchRow, NewCouponRow, RedemptionPatch};
pub use repository::{CouponsRepository, MockCouponsRepository, RestCouponsRepository};
pub use service::*;
