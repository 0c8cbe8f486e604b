//! Coupons: batch issuance, lookup, cards and redemption

mod errors;
mod handlers;

pub(crate) use errors::*;
pub(crate) use handlers::*;
