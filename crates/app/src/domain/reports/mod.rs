//! Reports

pub mod errors;
pub mod models;
pub mod service;

pub use errors::ReportsServiceError;
pub use service::*;
