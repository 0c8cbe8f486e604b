//! Coupon Handlers

pub(crate) mod batches;
pub(crate) mod coupons;

use rust_decimal::Decimal;
use salvo::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderValue},
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftqr_app::domain::coupons::{
    data::BatchCoupons,
    models::{Batch, Coupon, Redemption},
};

use crate::extensions::*;

/// Completed redemption
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionResponse {
    pub redeemed_by: Uuid,
    pub branch_id: i64,
    pub redeemed_at: String,
    pub invoice_number: Option<String>,
}

impl From<Redemption> for RedemptionResponse {
    fn from(redemption: Redemption) -> Self {
        Self {
            redeemed_by: redemption.redeemed_by.into_uuid(),
            branch_id: redemption.branch.into_i64(),
            redeemed_at: redemption.redeemed_at.to_string(),
            invoice_number: redemption.invoice_number,
        }
    }
}

/// Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub consecutive: u64,

    /// Printed sequence label, e.g. `No. 000042`
    pub sequence: String,

    pub promo_id: i64,

    /// Empty when the coupon is valid at every branch
    pub allowed_branch_ids: Vec<i64>,

    #[salvo(schema(value_type = String))]
    pub value_usd: Decimal,

    #[salvo(schema(value_type = String))]
    pub value_pab: Decimal,

    /// Last valid day, `YYYY-MM-DD`
    pub expires_on: String,

    pub redeemed: bool,
    pub redemption: Option<RedemptionResponse>,
    pub created_at: String,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            id: coupon.id.into_uuid(),
            batch_id: coupon.batch.into_uuid(),
            consecutive: coupon.consecutive,
            sequence: coupon.sequence_label().to_string(),
            promo_id: coupon.promo.into_i64(),
            allowed_branch_ids: coupon.allowed_branches.iter().map(Into::into).collect(),
            value_usd: coupon.face_value.usd,
            value_pab: coupon.face_value.pab,
            expires_on: coupon.expires_on.to_string(),
            redeemed: coupon.is_redeemed(),
            redemption: coupon.redemption.map(Into::into),
            created_at: coupon.created_at.to_string(),
        }
    }
}

/// Batch Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BatchResponse {
    pub id: Uuid,
    pub name: String,
    pub first_consecutive: u64,
    pub last_consecutive: u64,
    pub allowed_branch_ids: Vec<i64>,
    pub expires_on: String,
    pub issuer_id: i64,
    pub created_by: Uuid,
    pub created_at: String,
    pub coupons: Vec<CouponResponse>,
}

impl BatchResponse {
    fn new(batch: Batch, coupons: Vec<Coupon>) -> Self {
        Self {
            id: batch.id.into_uuid(),
            name: batch.name,
            first_consecutive: batch.consecutives.start(),
            last_consecutive: batch.consecutives.end(),
            allowed_branch_ids: batch.allowed_branches.iter().map(Into::into).collect(),
            expires_on: batch.expires_on.to_string(),
            issuer_id: batch.issuer.into_i64(),
            created_by: batch.created_by.into_uuid(),
            created_at: batch.created_at.to_string(),
            coupons: coupons.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BatchCoupons> for BatchResponse {
    fn from(issued: BatchCoupons) -> Self {
        Self::new(issued.batch, issued.coupons)
    }
}

/// Write a rendered file as the response body.
fn attach_file(
    res: &mut Response,
    content_type: &'static str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), StatusError> {
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{filename}\""))
        .or_500("invalid content disposition")?;

    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    res.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    res.body(bytes);

    Ok(())
}
