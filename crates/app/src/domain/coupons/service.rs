//! Coupons service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::{
    auth::{Role, SessionContext},
    cards::{CardContent, qr},
    domain::{
        coupons::{
            data::{BatchCoupons, IssueBatch, RedeemCoupon},
            errors::CouponsServiceError,
            issuance,
            models::{BatchUuid, BranchPermissions, Coupon, CouponUuid},
            records::RedemptionPatch,
            redemption::{RedemptionRejected, check_redemption},
            repository::CouponsRepository,
        },
        master_data::{
            MasterDataRepository,
            models::{BranchId, Promo, PromoId},
        },
    },
};

const ISSUERS: &[Role] = &[Role::Admin, Role::Creator];
const REDEEMERS: &[Role] = &[Role::Admin, Role::Cashier];
const VIEWERS: &[Role] = &[Role::Admin, Role::Creator, Role::Cashier];

#[derive(Clone)]
pub struct DefaultCouponsService {
    coupons: Arc<dyn CouponsRepository>,
    master_data: Arc<dyn MasterDataRepository>,
    time_zone: TimeZone,
}

impl DefaultCouponsService {
    #[must_use]
    pub fn new(
        coupons: Arc<dyn CouponsRepository>,
        master_data: Arc<dyn MasterDataRepository>,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            coupons,
            master_data,
            time_zone,
        }
    }

    async fn promos_by_id(
        &self,
        session: &SessionContext,
    ) -> Result<FxHashMap<PromoId, Promo>, CouponsServiceError> {
        let promos = self.master_data.list_promos(session.token()).await?;

        Ok(promos.into_iter().map(|promo| (promo.id, promo)).collect())
    }

    fn redemption_branch(
        session: &SessionContext,
        request: &RedeemCoupon,
    ) -> Result<BranchId, CouponsServiceError> {
        let branch = match session.role() {
            Role::Admin => request.branch.or(session.branch()),
            Role::Creator | Role::Cashier => session.branch(),
        };

        branch.ok_or(CouponsServiceError::MissingBranch)
    }
}

impl std::fmt::Debug for DefaultCouponsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCouponsService")
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CouponsService for DefaultCouponsService {
    async fn issue_batch(
        &self,
        session: &SessionContext,
        request: IssueBatch,
        now: Timestamp,
    ) -> Result<BatchCoupons, CouponsServiceError> {
        session.require_any(ISSUERS)?;

        issuance::validate(&request)?;

        let token = session.token();

        self.master_data
            .find_promo(token, request.promo)
            .await?
            .ok_or(CouponsServiceError::UnknownPromo)?;

        let issuer = self
            .master_data
            .find_issuer(token, request.issuer)
            .await?
            .ok_or(CouponsServiceError::UnknownIssuer)?;

        let allowed_branches = if request.branch_names.iter().all(|name| name.trim().is_empty()) {
            BranchPermissions::unrestricted()
        } else {
            let branches = self.master_data.list_branches(token).await?;

            issuance::resolve_branches(&request.branch_names, &branches)?
        };

        let issued_on = now.to_zoned(self.time_zone.clone()).date();
        let expires_on = issuance::expiration_date(issued_on, request.validity_days)?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(
                || issuance::default_batch_name(&issuer, issued_on),
                ToString::to_string,
            );

        let consecutives = self
            .coupons
            .reserve_consecutives(token, request.count)
            .await
            .map_err(CouponsServiceError::from_issuance)?;

        let plan = issuance::plan_batch(
            &request,
            name,
            consecutives,
            &allowed_branches,
            expires_on,
            session.user(),
        );

        let issued = match self.coupons.create_batch(token, &plan).await {
            Ok(issued) => issued,
            Err(source) => {
                warn!(
                    first = consecutives.start(),
                    last = consecutives.end(),
                    "batch write failed, reserved consecutive numbers are left unused"
                );

                return Err(CouponsServiceError::from_issuance(source));
            }
        };

        info!(
            batch = %issued.batch.id,
            coupons = issued.coupons.len(),
            first = consecutives.start(),
            last = consecutives.end(),
            %expires_on,
            "coupon batch issued"
        );

        Ok(issued)
    }

    async fn get_coupon(
        &self,
        session: &SessionContext,
        coupon: CouponUuid,
    ) -> Result<Coupon, CouponsServiceError> {
        session.require_any(VIEWERS)?;

        self.coupons
            .find_coupon(session.token(), coupon)
            .await?
            .ok_or(CouponsServiceError::NotFound)
    }

    async fn scan_coupon(
        &self,
        session: &SessionContext,
        image: Vec<u8>,
    ) -> Result<Coupon, CouponsServiceError> {
        session.require_any(VIEWERS)?;

        let payload = tokio::task::spawn_blocking(move || qr::decode(&image))
            .await
            .map_err(CouponsServiceError::Task)?
            .map_err(CouponsServiceError::UnreadableCode)?;

        let coupon: CouponUuid = payload
            .parse()
            .map_err(|_error: uuid::Error| CouponsServiceError::InvalidPayload(payload.clone()))?;

        self.get_coupon(session, coupon).await
    }

    async fn redeem_coupon(
        &self,
        session: &SessionContext,
        request: RedeemCoupon,
        now: Timestamp,
    ) -> Result<Coupon, CouponsServiceError> {
        session.require_any(REDEEMERS)?;

        let invoice_number = request.invoice_number.trim().to_string();

        if invoice_number.is_empty() {
            return Err(CouponsServiceError::MissingInvoiceNumber);
        }

        let branch = Self::redemption_branch(session, &request)?;
        let token = session.token();

        let coupon = self
            .coupons
            .find_coupon(token, request.coupon)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        let today = now.to_zoned(self.time_zone.clone()).date();

        if let Err(rejected) = check_redemption(&coupon, branch, today) {
            warn!(coupon = %coupon.id, %branch, "redemption rejected: {rejected}");

            return Err(rejected.into());
        }

        let patch = RedemptionPatch {
            redeemed: true,
            redeemed_by: session.user(),
            redeemed_branch_id: branch,
            redeemed_at: now,
            invoice_number,
        };

        let Some(redeemed) = self
            .coupons
            .mark_redeemed(token, coupon.id, &patch)
            .await?
        else {
            warn!(coupon = %coupon.id, "coupon redeemed concurrently");

            return Err(RedemptionRejected::already_redeemed().into());
        };

        info!(
            coupon = %redeemed.id,
            consecutive = redeemed.consecutive,
            %branch,
            user = %session.user(),
            "coupon redeemed"
        );

        Ok(redeemed)
    }

    async fn get_batch(
        &self,
        session: &SessionContext,
        batch: BatchUuid,
    ) -> Result<BatchCoupons, CouponsServiceError> {
        session.require_any(ISSUERS)?;

        let token = session.token();

        let batch = self
            .coupons
            .find_batch(token, batch)
            .await?
            .ok_or(CouponsServiceError::BatchNotFound)?;

        let coupons = self.coupons.list_batch_coupons(token, batch.id).await?;

        Ok(BatchCoupons { batch, coupons })
    }

    async fn batch_cards(
        &self,
        session: &SessionContext,
        batch: BatchUuid,
    ) -> Result<Vec<CardContent>, CouponsServiceError> {
        let BatchCoupons { coupons, .. } = self.get_batch(session, batch).await?;
        let promos = self.promos_by_id(session).await?;

        coupons
            .iter()
            .map(|coupon| {
                promos
                    .get(&coupon.promo)
                    .map(|promo| CardContent::for_coupon(coupon, promo))
                    .ok_or(CouponsServiceError::UnknownPromo)
            })
            .collect()
    }

    async fn coupon_card(
        &self,
        session: &SessionContext,
        coupon: CouponUuid,
    ) -> Result<CardContent, CouponsServiceError> {
        session.require_any(ISSUERS)?;

        let coupon = self.get_coupon(session, coupon).await?;

        let promo = self
            .master_data
            .find_promo(session.token(), coupon.promo)
            .await?
            .ok_or(CouponsServiceError::UnknownPromo)?;

        Ok(CardContent::for_coupon(&coupon, &promo))
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Issue a batch: reserve consecutive numbers, then write the batch and
    /// all its coupons at once.
    async fn issue_batch(
        &self,
        session: &SessionContext,
        request: IssueBatch,
        now: Timestamp,
    ) -> Result<BatchCoupons, CouponsServiceError>;

    async fn get_coupon(
        &self,
        session: &SessionContext,
        coupon: CouponUuid,
    ) -> Result<Coupon, CouponsServiceError>;

    /// Decode a photographed QR code and look the coupon up.
    async fn scan_coupon(
        &self,
        session: &SessionContext,
        image: Vec<u8>,
    ) -> Result<Coupon, CouponsServiceError>;

    /// Redeem a coupon at the caller's branch.
    ///
    /// A missing coupon fails with `NotFound`; otherwise every failed rule is
    /// reported together in `Rejected`.
    async fn redeem_coupon(
        &self,
        session: &SessionContext,
        request: RedeemCoupon,
        now: Timestamp,
    ) -> Result<Coupon, CouponsServiceError>;

    async fn get_batch(
        &self,
        session: &SessionContext,
        batch: BatchUuid,
    ) -> Result<BatchCoupons, CouponsServiceError>;

    /// Card contents for every coupon of a batch, in consecutive order.
    async fn batch_cards(
        &self,
        session: &SessionContext,
        batch: BatchUuid,
    ) -> Result<Vec<CardContent>, CouponsServiceError>;

    async fn coupon_card(
        &self,
        session: &SessionContext,
        coupon: CouponUuid,
    ) -> Result<CardContent, CouponsServiceError>;
}
