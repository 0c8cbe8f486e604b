//! Branches, promotion types, issuers and roles

pub mod data;
pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::MasterDataServiceError;
pub use repository::{MasterDataRepository, MockMasterDataRepository, RestMasterDataRepository};
pub use service::*;
