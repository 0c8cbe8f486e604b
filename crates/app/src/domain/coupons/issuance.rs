//! Batch issuance planning.

use jiff::{ToSpan, civil::Date};
use rustc_hash::FxHashMap;

use crate::{
    auth::UserUuid,
    domain::{
        coupons::{
            data::IssueBatch,
            errors::CouponsServiceError,
            models::{BatchUuid, BranchPermissions, ConsecutiveRange, CouponUuid},
            records::{NewBatchRow, NewCouponRow},
        },
        master_data::models::{Branch, Issuer},
    },
};

/// Largest number of coupons a single batch may hold.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Longest validity window, in days.
pub const MAX_VALIDITY_DAYS: u32 = 3650;

/// Rows written by one issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBatch {
    pub batch: NewBatchRow,
    pub coupons: Vec<NewCouponRow>,
}

/// Check the request's shape before anything is looked up or reserved.
pub fn validate(request: &IssueBatch) -> Result<(), CouponsServiceError> {
    if request.count == 0 || request.count > MAX_BATCH_SIZE {
        return Err(CouponsServiceError::InvalidBatchSize {
            requested: request.count,
            max: MAX_BATCH_SIZE,
        });
    }

    if request.validity_days == 0 || request.validity_days > MAX_VALIDITY_DAYS {
        return Err(CouponsServiceError::InvalidValidity {
            requested: request.validity_days,
            max: MAX_VALIDITY_DAYS,
        });
    }

    if request.face_value.is_negative() {
        return Err(CouponsServiceError::NegativeFaceValue);
    }

    Ok(())
}

/// Resolve branch names to ids, matching trimmed names case-insensitively.
///
/// Every name that matches no branch is reported.
pub fn resolve_branches(
    names: &[String],
    branches: &[Branch],
) -> Result<BranchPermissions, CouponsServiceError> {
    let by_name: FxHashMap<String, &Branch> = branches
        .iter()
        .map(|branch| (branch.name.trim().to_lowercase(), branch))
        .collect();

    let mut unknown = Vec::new();
    let mut resolved = Vec::with_capacity(names.len());

    for name in names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
        match by_name.get(&name.to_lowercase()) {
            Some(branch) => resolved.push(branch.id),
            None => unknown.push(name.to_string()),
        }
    }

    if !unknown.is_empty() {
        return Err(CouponsServiceError::UnknownBranches(unknown));
    }

    Ok(resolved.into_iter().collect())
}

/// Last day a coupon issued on `issued_on` may be redeemed.
pub fn expiration_date(issued_on: Date, validity_days: u32) -> Result<Date, CouponsServiceError> {
    issued_on
        .checked_add(i64::from(validity_days).days())
        .map_err(CouponsServiceError::InvalidDate)
}

/// Batch name used when none is given.
#[must_use]
pub fn default_batch_name(issuer: &Issuer, issued_on: Date) -> String {
    format!("{} {issued_on}", issuer.name.trim())
}

/// Lay out the batch and one coupon per reserved consecutive number.
#[must_use]
pub fn plan_batch(
    request: &IssueBatch,
    name: String,
    consecutives: ConsecutiveRange,
    allowed_branches: &BranchPermissions,
    expires_on: Date,
    created_by: UserUuid,
) -> NewBatch {
    let batch_id = BatchUuid::new();

    let coupons = consecutives
        .iter()
        .map(|consecutive| NewCouponRow {
            id: CouponUuid::new(),
            batch_id,
            consecutive,
            promo_id: request.promo,
            allowed_branches: allowed_branches.clone(),
            value_usd: request.face_value.usd,
            value_pab: request.face_value.pab,
            expires_on,
        })
        .collect();

    NewBatch {
        batch: NewBatchRow {
            id: batch_id,
            batch_name: name,
            first_consecutive: consecutives.start(),
            last_consecutive: consecutives.end(),
            allowed_branches: allowed_branches.clone(),
            expires_on,
            issuer_id: request.issuer,
            created_by,
        },
        coupons,
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rustc_hash::FxHashSet;
    use testresult::TestResult;

    use crate::{
        domain::{
            coupons::models::FaceValue,
            master_data::models::{BranchId, IssuerId, PromoId},
        },
        test::fixtures::branch,
    };

    use super::*;

    fn request(count: u32) -> IssueBatch {
        IssueBatch {
            promo: PromoId::from_i64(1),
            face_value: FaceValue {
                usd: Decimal::from(25),
                pab: Decimal::from(25),
            },
            validity_days: 30,
            branch_names: Vec::new(),
            issuer: IssuerId::from_i64(1),
            count,
            name: None,
        }
    }

    #[test]
    fn batch_size_is_bounded() {
        assert!(matches!(
            validate(&request(0)),
            Err(CouponsServiceError::InvalidBatchSize { requested: 0, .. })
        ));
        assert!(validate(&request(MAX_BATCH_SIZE)).is_ok());
        assert!(validate(&request(MAX_BATCH_SIZE + 1)).is_err());
    }

    #[test]
    fn validity_and_face_value_are_checked() {
        let zero_days = IssueBatch {
            validity_days: 0,
            ..request(1)
        };
        let negative = IssueBatch {
            face_value: FaceValue {
                usd: Decimal::from(-1),
                pab: Decimal::ZERO,
            },
            ..request(1)
        };

        assert!(matches!(
            validate(&zero_days),
            Err(CouponsServiceError::InvalidValidity { .. })
        ));
        assert!(matches!(
            validate(&negative),
            Err(CouponsServiceError::NegativeFaceValue)
        ));
    }

    #[test]
    fn branch_names_resolve_case_insensitively() -> TestResult {
        let branches = vec![branch(1, "Sucursal Norte"), branch(2, "Sucursal Sur")];

        let permissions = resolve_branches(
            &[" sucursal norte ".to_string(), "SUCURSAL NORTE".to_string()],
            &branches,
        )?;

        assert!(permissions.allows(BranchId::from_i64(1)));
        assert!(!permissions.allows(BranchId::from_i64(2)));

        Ok(())
    }

    #[test]
    fn unknown_branch_names_are_all_reported() {
        let branches = vec![branch(1, "Sucursal Norte")];

        let result = resolve_branches(
            &["Sucursal Este".to_string(), "Sucursal Norte".to_string(), "Centro".to_string()],
            &branches,
        );

        assert!(
            matches!(&result, Err(CouponsServiceError::UnknownBranches(names)) if names == &["Sucursal Este", "Centro"]),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn no_branch_names_means_unrestricted() -> TestResult {
        let permissions = resolve_branches(&[" ".to_string()], &[branch(1, "Sucursal Norte")])?;

        assert!(!permissions.is_restricted());

        Ok(())
    }

    #[test]
    fn expiration_adds_calendar_days() -> TestResult {
        assert_eq!(expiration_date(date(2026, 10, 17), 30)?, date(2026, 11, 16));
        assert_eq!(expiration_date(date(2026, 12, 31), 1)?, date(2027, 1, 1));

        Ok(())
    }

    #[test]
    fn default_name_is_issuer_and_date() {
        let issuer = Issuer {
            id: IssuerId::from_i64(1),
            name: "Mercadeo ".to_string(),
        };

        assert_eq!(
            default_batch_name(&issuer, date(2026, 10, 17)),
            "Mercadeo 2026-10-17"
        );
    }

    #[test]
    fn plan_creates_one_coupon_per_consecutive() -> TestResult {
        let range = ConsecutiveRange::new(41, 50).ok_or("invalid range")?;
        let branches: BranchPermissions = [BranchId::from_i64(1)].into_iter().collect();

        let plan = plan_batch(
            &request(10),
            "Lote".to_string(),
            range,
            &branches,
            date(2026, 11, 16),
            UserUuid::new(),
        );

        let consecutives: Vec<u64> = plan.coupons.iter().map(|coupon| coupon.consecutive).collect();
        let ids: FxHashSet<CouponUuid> = plan.coupons.iter().map(|coupon| coupon.id).collect();

        assert_eq!(consecutives, (41..=50).collect::<Vec<_>>());
        assert_eq!(ids.len(), 10, "coupon ids must be unique");
        assert!(plan.coupons.iter().all(|coupon| coupon.batch_id == plan.batch.id));
        assert!(
            plan.coupons
                .iter()
                .all(|coupon| coupon.expires_on == date(2026, 11, 16))
        );
        assert_eq!(plan.batch.first_consecutive, 41);
        assert_eq!(plan.batch.last_consecutive, 50);

        Ok(())
    }
}
