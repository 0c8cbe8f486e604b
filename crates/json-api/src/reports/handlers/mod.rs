//! Report Handlers

pub(crate) mod coupons;
