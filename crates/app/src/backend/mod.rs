//! Hosted backend access
//!
//! The tabular backend is a PostgREST-style API: one resource per table,
//! filters as query parameters, and stored functions under `/rpc`.

mod client;
mod errors;
mod query;
mod token;

pub use client::{BackendConfig, RestClient};
pub use errors::BackendError;
pub use query::Query;
pub use token::AccessToken;
