//! Coupon Inputs

use jiff::Timestamp;

use crate::domain::{
    coupons::models::{Batch, Coupon, CouponUuid, FaceValue},
    master_data::models::{BranchId, IssuerId, PromoId},
};

/// Request to issue a batch of coupons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBatch {
    pub promo: PromoId,
    pub face_value: FaceValue,
    pub validity_days: u32,

    /// Branch names the coupons are restricted to. Empty means any branch.
    pub branch_names: Vec<String>,

    pub issuer: IssuerId,
    pub count: u32,

    /// Defaults to the issuer's name followed by the issue date.
    pub name: Option<String>,
}

/// A batch together with its coupons, in consecutive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCoupons {
    pub batch: Batch,
    pub coupons: Vec<Coupon>,
}

/// Request to redeem a scanned coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemCoupon {
    pub coupon: CouponUuid,
    pub invoice_number: String,

    /// Only honored for admins, who have no branch of their own.
    pub branch: Option<BranchId>,
}

/// Coupon listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CouponFilter {
    pub redeemed: Option<bool>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}
