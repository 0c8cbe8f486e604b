//! Coupon and batch rows as stored by the backend.

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        coupons::models::{
            Batch, BatchUuid, BranchPermissions, ConsecutiveRange, Coupon, CouponUuid, FaceValue,
            Redemption,
        },
        master_data::models::{BranchId, IssuerId, PromoId},
    },
};

pub(crate) const COUPONS_TABLE: &str = "coupons";
pub(crate) const BATCHES_TABLE: &str = "batches";

/// Rows the backend returned that break a coupon or batch invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InconsistentRecord {
    #[error("coupon {0} is marked redeemed without redeemer, branch and timestamp")]
    IncompleteRedemption(Uuid),

    #[error("record {0} has a negative consecutive number")]
    NegativeConsecutive(Uuid),

    #[error("batch {0} has an inverted consecutive range")]
    InvertedRange(Uuid),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CouponRecord {
    id: Uuid,
    batch_id: Uuid,
    consecutive: i64,
    promo_id: i64,
    #[serde(default)]
    allowed_branches: Option<Vec<i64>>,
    value_usd: Decimal,
    value_pab: Decimal,
    expires_on: Date,
    redeemed: bool,
    redeemed_by: Option<Uuid>,
    redeemed_branch_id: Option<i64>,
    redeemed_at: Option<Timestamp>,
    invoice_number: Option<String>,
    created_at: Timestamp,
}

fn permissions(branches: Option<Vec<i64>>) -> BranchPermissions {
    branches
        .unwrap_or_default()
        .into_iter()
        .map(BranchId::from_i64)
        .collect()
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = InconsistentRecord;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        let redemption = if record.redeemed {
            match (
                record.redeemed_by,
                record.redeemed_branch_id,
                record.redeemed_at,
            ) {
                (Some(user), Some(branch), Some(at)) => Some(Redemption {
                    redeemed_by: UserUuid::from_uuid(user),
                    branch: BranchId::from_i64(branch),
                    redeemed_at: at,
                    invoice_number: record.invoice_number,
                }),
                _ => return Err(InconsistentRecord::IncompleteRedemption(record.id)),
            }
        } else {
            None
        };

        let consecutive = u64::try_from(record.consecutive)
            .ok()
            .ok_or(InconsistentRecord::NegativeConsecutive(record.id))?;

        Ok(Self {
            id: CouponUuid::from_uuid(record.id),
            batch: BatchUuid::from_uuid(record.batch_id),
            consecutive,
            promo: PromoId::from_i64(record.promo_id),
            allowed_branches: permissions(record.allowed_branches),
            face_value: FaceValue {
                usd: record.value_usd,
                pab: record.value_pab,
            },
            expires_on: record.expires_on,
            redemption,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchRecord {
    id: Uuid,
    batch_name: String,
    first_consecutive: i64,
    last_consecutive: i64,
    #[serde(default)]
    allowed_branches: Option<Vec<i64>>,
    expires_on: Date,
    issuer_id: i64,
    created_by: Uuid,
    created_at: Timestamp,
}

impl TryFrom<BatchRecord> for Batch {
    type Error = InconsistentRecord;

    fn try_from(record: BatchRecord) -> Result<Self, Self::Error> {
        let negative = InconsistentRecord::NegativeConsecutive(record.id);
        let start = u64::try_from(record.first_consecutive)
            .ok()
            .ok_or_else(|| negative.clone())?;
        let end = u64::try_from(record.last_consecutive)
            .ok()
            .ok_or(negative)?;

        let consecutives =
            ConsecutiveRange::new(start, end).ok_or(InconsistentRecord::InvertedRange(record.id))?;

        Ok(Self {
            id: BatchUuid::from_uuid(record.id),
            name: record.batch_name,
            consecutives,
            allowed_branches: permissions(record.allowed_branches),
            expires_on: record.expires_on,
            issuer: IssuerId::from_i64(record.issuer_id),
            created_by: UserUuid::from_uuid(record.created_by),
            created_at: record.created_at,
        })
    }
}

/// Batch row sent to the issuance function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBatchRow {
    pub id: BatchUuid,
    pub batch_name: String,
    pub first_consecutive: u64,
    pub last_consecutive: u64,
    pub allowed_branches: BranchPermissions,
    pub expires_on: Date,
    pub issuer_id: IssuerId,
    pub created_by: UserUuid,
}

/// Coupon row sent to the issuance function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCouponRow {
    pub id: CouponUuid,
    pub batch_id: BatchUuid,
    pub consecutive: u64,
    pub promo_id: PromoId,
    pub allowed_branches: BranchPermissions,
    pub value_usd: Decimal,
    pub value_pab: Decimal,
    pub expires_on: Date,
}

/// Fields written when a coupon is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionPatch {
    pub redeemed: bool,
    pub redeemed_by: UserUuid,
    pub redeemed_branch_id: BranchId,
    pub redeemed_at: Timestamp,
    pub invoice_number: String,
}
