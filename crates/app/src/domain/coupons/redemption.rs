//! Redemption rules.

use std::fmt;

use jiff::civil::Date;
use serde::Serialize;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::domain::{coupons::models::Coupon, master_data::models::BranchId};

/// Why a coupon cannot be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    AlreadyRedeemed,
    Expired { expires_on: Date },
    BranchNotAllowed { branch: BranchId },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRedeemed => f.write_str("coupon was already redeemed"),
            Self::Expired { expires_on } => write!(f, "coupon expired on {expires_on}"),
            Self::BranchNotAllowed { branch } => {
                write!(f, "coupon is not valid at branch {branch}")
            }
        }
    }
}

impl RejectionReason {
    /// Stable label, used as a metric dimension.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AlreadyRedeemed => "already_redeemed",
            Self::Expired { .. } => "expired",
            Self::BranchNotAllowed { .. } => "branch_not_allowed",
        }
    }
}

/// Every rule a redemption attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redemption rejected: {}", display_reasons(.reasons))]
pub struct RedemptionRejected {
    pub reasons: SmallVec<[RejectionReason; 3]>,
}

impl RedemptionRejected {
    pub(crate) fn already_redeemed() -> Self {
        Self {
            reasons: smallvec![RejectionReason::AlreadyRedeemed],
        }
    }
}

fn display_reasons(reasons: &[RejectionReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Evaluate every redemption rule at once.
///
/// Redemption, expiration and branch permission are independent, so all
/// failing rules are reported together.
pub fn check_redemption(
    coupon: &Coupon,
    branch: BranchId,
    today: Date,
) -> Result<(), RedemptionRejected> {
    let mut reasons = SmallVec::new();

    if coupon.is_redeemed() {
        reasons.push(RejectionReason::AlreadyRedeemed);
    }

    if coupon.is_expired(today) {
        reasons.push(RejectionReason::Expired {
            expires_on: coupon.expires_on,
        });
    }

    if !coupon.allowed_branches.allows(branch) {
        reasons.push(RejectionReason::BranchNotAllowed { branch });
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(RedemptionRejected { reasons })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        auth::UserUuid,
        domain::coupons::models::{BranchPermissions, Redemption},
        test::fixtures::coupon,
    };

    use super::*;

    const NORTE: BranchId = BranchId::from_i64(1);
    const SUR: BranchId = BranchId::from_i64(2);

    fn reasons(result: Result<(), RedemptionRejected>) -> Vec<RejectionReason> {
        result
            .err()
            .map(|rejected| rejected.reasons.into_vec())
            .unwrap_or_default()
    }

    #[test]
    fn unrestricted_coupon_is_redeemable_through_last_day() {
        let coupon = coupon(1, date(2026, 11, 16), BranchPermissions::unrestricted());

        assert_eq!(check_redemption(&coupon, SUR, date(2026, 10, 17)), Ok(()));
        assert_eq!(check_redemption(&coupon, NORTE, date(2026, 11, 16)), Ok(()));
    }

    #[test]
    fn coupon_is_expired_the_day_after() {
        let coupon = coupon(1, date(2026, 11, 16), BranchPermissions::unrestricted());

        assert_eq!(
            reasons(check_redemption(&coupon, NORTE, date(2026, 11, 17))),
            vec![RejectionReason::Expired {
                expires_on: date(2026, 11, 16)
            }]
        );
    }

    #[test]
    fn restricted_coupon_rejects_other_branches() {
        let coupon = coupon(1, date(2026, 11, 16), [NORTE].into_iter().collect());

        assert_eq!(
            reasons(check_redemption(&coupon, SUR, date(2026, 10, 17))),
            vec![RejectionReason::BranchNotAllowed { branch: SUR }]
        );
        assert_eq!(check_redemption(&coupon, NORTE, date(2026, 10, 17)), Ok(()));
    }

    #[test]
    fn every_failing_rule_is_reported() {
        let mut coupon = coupon(1, date(2026, 10, 1), [NORTE].into_iter().collect());

        coupon.redemption = Some(Redemption {
            redeemed_by: UserUuid::new(),
            branch: NORTE,
            redeemed_at: jiff::Timestamp::UNIX_EPOCH,
            invoice_number: None,
        });

        assert_eq!(
            reasons(check_redemption(&coupon, SUR, date(2026, 10, 17))),
            vec![
                RejectionReason::AlreadyRedeemed,
                RejectionReason::Expired {
                    expires_on: date(2026, 10, 1)
                },
                RejectionReason::BranchNotAllowed { branch: SUR },
            ]
        );
    }

    #[test]
    fn rejection_message_lists_reasons() {
        let rejected = RedemptionRejected::already_redeemed();

        assert_eq!(rejected.reasons.len(), 1);
        assert_eq!(
            rejected.to_string(),
            "redemption rejected: coupon was already redeemed"
        );
    }
}
