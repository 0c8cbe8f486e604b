//! Reports service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{ToSpan, Timestamp, civil::Date, tz::TimeZone};
use mockall::automock;

use crate::{
    auth::{Role, SessionContext},
    domain::{
        coupons::{CouponsRepository, data::CouponFilter},
        reports::{
            errors::ReportsServiceError,
            models::{CouponReport, ReportFilter, ReportTotals},
        },
    },
};

#[derive(Clone)]
pub struct DefaultReportsService {
    coupons: Arc<dyn CouponsRepository>,
    time_zone: TimeZone,
}

impl DefaultReportsService {
    #[must_use]
    pub fn new(coupons: Arc<dyn CouponsRepository>, time_zone: TimeZone) -> Self {
        Self { coupons, time_zone }
    }

    fn start_of(&self, day: Date) -> Result<Timestamp, ReportsServiceError> {
        day.to_zoned(self.time_zone.clone())
            .map(|zoned| zoned.timestamp())
            .map_err(ReportsServiceError::InvalidDate)
    }

    /// Last instant of `day`, as the instant before the next day starts.
    fn end_of(&self, day: Date) -> Result<Timestamp, ReportsServiceError> {
        let next = day
            .checked_add(1.day())
            .map_err(ReportsServiceError::InvalidDate)?;

        self.start_of(next)?
            .checked_sub(1.nanosecond())
            .map_err(ReportsServiceError::InvalidDate)
    }

    fn coupon_filter(&self, filter: ReportFilter) -> Result<CouponFilter, ReportsServiceError> {
        if matches!((filter.created_from, filter.created_to), (Some(from), Some(to)) if from > to) {
            return Err(ReportsServiceError::InvalidRange);
        }

        Ok(CouponFilter {
            redeemed: filter.status.redeemed(),
            created_from: filter.created_from.map(|day| self.start_of(day)).transpose()?,
            created_to: filter.created_to.map(|day| self.end_of(day)).transpose()?,
        })
    }
}

impl std::fmt::Debug for DefaultReportsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultReportsService")
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReportsService for DefaultReportsService {
    async fn coupon_report(
        &self,
        session: &SessionContext,
        filter: ReportFilter,
    ) -> Result<CouponReport, ReportsServiceError> {
        session.require_any(&[Role::Admin])?;

        let coupons = self
            .coupons
            .list_coupons(session.token(), self.coupon_filter(filter)?)
            .await?;

        let totals = ReportTotals::count(&coupons);

        Ok(CouponReport { coupons, totals })
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Coupons matching the filter with redeemed/pending totals.
    async fn coupon_report(
        &self,
        session: &SessionContext,
        filter: ReportFilter,
    ) -> Result<CouponReport, ReportsServiceError>;
}
