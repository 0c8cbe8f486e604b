//! Master data: branches, promotion types, issuers and roles

mod errors;
mod handlers;

pub(crate) use errors::*;
pub(crate) use handlers::*;
