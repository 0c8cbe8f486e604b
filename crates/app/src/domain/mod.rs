//! Gift coupon domain concerns

pub mod coupons;
pub mod master_data;
pub mod reports;
pub mod users;
