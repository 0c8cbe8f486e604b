//! Coupons repository.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    backend::{AccessToken, BackendError, Query, RestClient},
    domain::coupons::{
        data::{BatchCoupons, CouponFilter},
        issuance::NewBatch,
        models::{Batch, BatchUuid, ConsecutiveRange, Coupon, CouponUuid},
        records::{
            BATCHES_TABLE, COUPONS_TABLE, NewBatchRow, NewCouponRow, RedemptionPatch,
        },
    },
};

const RESERVE_FUNCTION: &str = "reserve_coupon_consecutives";
const ISSUE_FUNCTION: &str = "issue_coupon_batch";

#[automock]
#[async_trait]
pub trait CouponsRepository: Send + Sync {
    /// Atomically reserve `count` consecutive numbers. Numbers are never
    /// handed out twice, even when the issuance using them fails.
    async fn reserve_consecutives(
        &self,
        token: &AccessToken,
        count: u32,
    ) -> Result<ConsecutiveRange, BackendError>;

    /// Write the batch and all its coupons in one transaction.
    async fn create_batch(
        &self,
        token: &AccessToken,
        batch: &NewBatch,
    ) -> Result<BatchCoupons, BackendError>;

    async fn find_coupon(
        &self,
        token: &AccessToken,
        coupon: CouponUuid,
    ) -> Result<Option<Coupon>, BackendError>;

    async fn find_batch(
        &self,
        token: &AccessToken,
        batch: BatchUuid,
    ) -> Result<Option<Batch>, BackendError>;

    /// Coupons of a batch, in consecutive order.
    async fn list_batch_coupons(
        &self,
        token: &AccessToken,
        batch: BatchUuid,
    ) -> Result<Vec<Coupon>, BackendError>;

    /// Apply the redemption only if the coupon is still unredeemed.
    ///
    /// Returns `None` when no unredeemed coupon matched, which means another
    /// redemption got there first.
    async fn mark_redeemed(
        &self,
        token: &AccessToken,
        coupon: CouponUuid,
        patch: &RedemptionPatch,
    ) -> Result<Option<Coupon>, BackendError>;

    /// Coupons matching the filter, newest consecutive first.
    async fn list_coupons(
        &self,
        token: &AccessToken,
        filter: CouponFilter,
    ) -> Result<Vec<Coupon>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct RestCouponsRepository {
    client: RestClient,
}

impl RestCouponsRepository {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
struct ReserveArgs {
    requested: u32,
}

#[derive(Debug, Deserialize)]
struct ReservedNumbers {
    start: u64,
    end: u64,
}

#[derive(Debug, Serialize)]
struct IssueArgs<'a> {
    batch: &'a NewBatchRow,
    coupons: &'a [NewCouponRow],
}

#[derive(Debug, Deserialize)]
struct IssuedRecords {
    batch: Batch,
    coupons: Vec<Coupon>,
}

pub(crate) fn filter_query(filter: CouponFilter) -> Query {
    let mut query = Query::new().select("*");

    if let Some(redeemed) = filter.redeemed {
        query = query.eq("redeemed", redeemed);
    }

    if let Some(from) = filter.created_from {
        query = query.gte("created_at", from);
    }

    if let Some(to) = filter.created_to {
        query = query.lte("created_at", to);
    }

    query.order_desc("consecutive")
}

#[async_trait]
impl CouponsRepository for RestCouponsRepository {
    async fn reserve_consecutives(
        &self,
        token: &AccessToken,
        count: u32,
    ) -> Result<ConsecutiveRange, BackendError> {
        let reserved: ReservedNumbers = self
            .client
            .rpc(token, RESERVE_FUNCTION, &ReserveArgs { requested: count })
            .await?;

        ConsecutiveRange::new(reserved.start, reserved.end)
            .filter(|range| range.count() == u64::from(count))
            .ok_or_else(|| BackendError::Unexpected {
                status: 200,
                message: format!(
                    "reserved range {}..={} does not hold {count} numbers",
                    reserved.start, reserved.end
                ),
            })
    }

    async fn create_batch(
        &self,
        token: &AccessToken,
        batch: &NewBatch,
    ) -> Result<BatchCoupons, BackendError> {
        let mut issued: IssuedRecords = self
            .client
            .rpc(
                token,
                ISSUE_FUNCTION,
                &IssueArgs {
                    batch: &batch.batch,
                    coupons: &batch.coupons,
                },
            )
            .await?;

        issued.coupons.sort_by_key(|coupon| coupon.consecutive);

        Ok(BatchCoupons {
            batch: issued.batch,
            coupons: issued.coupons,
        })
    }

    async fn find_coupon(
        &self,
        token: &AccessToken,
        coupon: CouponUuid,
    ) -> Result<Option<Coupon>, BackendError> {
        let rows: Vec<Coupon> = self
            .client
            .select(
                token,
                COUPONS_TABLE,
                &Query::new().select("*").eq("id", coupon).limit(1),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn find_batch(
        &self,
        token: &AccessToken,
        batch: BatchUuid,
    ) -> Result<Option<Batch>, BackendError> {
        let rows: Vec<Batch> = self
            .client
            .select(
                token,
                BATCHES_TABLE,
                &Query::new().select("*").eq("id", batch).limit(1),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn list_batch_coupons(
        &self,
        token: &AccessToken,
        batch: BatchUuid,
    ) -> Result<Vec<Coupon>, BackendError> {
        self.client
            .select_all(
                token,
                COUPONS_TABLE,
                &Query::new()
                    .select("*")
                    .eq("batch_id", batch)
                    .order_asc("consecutive"),
            )
            .await
    }

    async fn mark_redeemed(
        &self,
        token: &AccessToken,
        coupon: CouponUuid,
        patch: &RedemptionPatch,
    ) -> Result<Option<Coupon>, BackendError> {
        let rows: Vec<Coupon> = self
            .client
            .update(
                token,
                COUPONS_TABLE,
                &Query::new().eq("id", coupon).eq("redeemed", false),
                patch,
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn list_coupons(
        &self,
        token: &AccessToken,
        filter: CouponFilter,
    ) -> Result<Vec<Coupon>, BackendError> {
        self.client
            .select_all(token, COUPONS_TABLE, &filter_query(filter))
            .await
    }
}
