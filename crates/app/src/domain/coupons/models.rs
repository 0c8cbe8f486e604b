//! Coupon Models

use std::fmt;

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    auth::UserUuid,
    domain::{
        coupons::records::{BatchRecord, CouponRecord},
        master_data::models::{BranchId, IssuerId, PromoId},
    },
    ids::TypedUuid,
};

/// Coupon UUID, also the payload encoded in its QR code.
pub type CouponUuid = TypedUuid<Coupon>;

/// Batch UUID
pub type BatchUuid = TypedUuid<Batch>;

/// Inclusive range of consecutive numbers reserved for one batch.
///
/// Always non-empty, and its length always fits in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct ConsecutiveRange {
    start: u64,
    end: u64,
}

impl ConsecutiveRange {
    /// `None` when `end` precedes `start` or the range holds more than `u64::MAX` numbers.
    #[must_use]
    pub fn new(start: u64, end: u64) -> Option<Self> {
        end.checked_sub(start)?.checked_add(1)?;

        Some(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// How many numbers the range holds.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

#[derive(Debug, Deserialize)]
struct RangeBounds {
    start: u64,
    end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid consecutive range {start}..={end}")]
pub struct InvalidRange {
    pub start: u64,
    pub end: u64,
}

impl TryFrom<RangeBounds> for ConsecutiveRange {
    type Error = InvalidRange;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end).ok_or(InvalidRange {
            start: bounds.start,
            end: bounds.end,
        })
    }
}

/// Branches a coupon may be redeemed at. Empty means any branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchPermissions(SmallVec<[BranchId; 4]>);

impl BranchPermissions {
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.0.is_empty()
    }

    #[must_use]
    pub fn allows(&self, branch: BranchId) -> bool {
        !self.is_restricted() || self.0.contains(&branch)
    }

    pub fn iter(&self) -> impl Iterator<Item = BranchId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<BranchId> for BranchPermissions {
    fn from_iter<I: IntoIterator<Item = BranchId>>(iter: I) -> Self {
        let mut branches: SmallVec<[BranchId; 4]> = iter.into_iter().collect();

        branches.sort_unstable();
        branches.dedup();

        Self(branches)
    }
}

/// Face value printed on the coupon, in both accepted currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceValue {
    pub usd: Decimal,
    pub pab: Decimal,
}

impl FaceValue {
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.usd.is_sign_negative() || self.pab.is_sign_negative()
    }
}

/// A completed redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub redeemed_by: UserUuid,
    pub branch: BranchId,
    pub redeemed_at: Timestamp,
    pub invoice_number: Option<String>,
}

/// A single gift coupon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CouponRecord")]
pub struct Coupon {
    pub id: CouponUuid,
    pub batch: BatchUuid,
    pub consecutive: u64,
    pub promo: PromoId,
    pub allowed_branches: BranchPermissions,
    pub face_value: FaceValue,
    pub expires_on: Date,
    pub redemption: Option<Redemption>,
    pub created_at: Timestamp,
}

impl Coupon {
    #[must_use]
    pub fn is_redeemed(&self) -> bool {
        self.redemption.is_some()
    }

    /// Expired once `today` is past the expiration date.
    #[must_use]
    pub fn is_expired(&self, today: Date) -> bool {
        today > self.expires_on
    }

    /// Human-facing sequence label, e.g. `No. 000042`.
    #[must_use]
    pub fn sequence_label(&self) -> SequenceLabel {
        SequenceLabel(self.consecutive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLabel(u64);

impl fmt::Display for SequenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No. {:06}", self.0)
    }
}

/// Group of coupons issued together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BatchRecord")]
pub struct Batch {
    pub id: BatchUuid,
    pub name: String,
    pub consecutives: ConsecutiveRange,
    pub allowed_branches: BranchPermissions,
    pub expires_on: Date,
    pub issuer: IssuerId,
    pub created_by: UserUuid,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_permissions_allow_every_branch() {
        let permissions = BranchPermissions::unrestricted();

        assert!(permissions.allows(BranchId::from_i64(1)));
        assert!(permissions.allows(BranchId::from_i64(99)));
    }

    #[test]
    fn restricted_permissions_allow_only_listed_branches() {
        let permissions: BranchPermissions = [BranchId::from_i64(3), BranchId::from_i64(1)]
            .into_iter()
            .collect();

        assert!(permissions.allows(BranchId::from_i64(1)));
        assert!(!permissions.allows(BranchId::from_i64(2)));
    }

    #[test]
    fn permissions_are_sorted_and_deduplicated() {
        let permissions: BranchPermissions = [3, 1, 3, 2]
            .into_iter()
            .map(BranchId::from_i64)
            .collect();

        let ids: Vec<i64> = permissions.iter().map(BranchId::into_i64).collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn range_length_is_inclusive() {
        let range = ConsecutiveRange::new(41, 50);

        assert_eq!(range.map(|range| range.count()), Some(10));
        assert_eq!(ConsecutiveRange::new(5, 4), None);
    }

    #[test]
    fn range_too_long_to_count_is_rejected() {
        assert_eq!(ConsecutiveRange::new(0, u64::MAX), None);
        assert_eq!(
            ConsecutiveRange::new(1, u64::MAX).map(|range| range.count()),
            Some(u64::MAX)
        );
    }

    #[test]
    fn deserializing_checks_the_range() {
        let inverted = serde_json::from_str::<ConsecutiveRange>(r#"{"start": 9, "end": 3}"#);
        let overflowing = serde_json::from_str::<ConsecutiveRange>(&format!(
            r#"{{"start": 0, "end": {}}}"#,
            u64::MAX
        ));

        assert!(inverted.is_err(), "inverted range must not deserialize");
        assert!(overflowing.is_err(), "uncountable range must not deserialize");
    }

    #[test]
    fn sequence_label_is_zero_padded() {
        assert_eq!(SequenceLabel(42).to_string(), "No. 000042");
        assert_eq!(SequenceLabel(1_234_567).to_string(), "No. 1234567");
    }
}
