//! Coupon Report Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use giftqr_app::domain::reports::models::{CouponReport, ReportFilter, ReportTotals, StatusFilter};

use crate::{
    coupons::CouponResponse, extensions::*, reports::into_status_error, state::State,
};

/// Report counts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TotalsResponse {
    pub total: usize,
    pub redeemed: usize,
    pub pending: usize,
}

impl From<ReportTotals> for TotalsResponse {
    fn from(totals: ReportTotals) -> Self {
        Self {
            total: totals.total,
            redeemed: totals.redeemed,
            pending: totals.pending,
        }
    }
}

/// Coupon Report Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponReportResponse {
    pub coupons: Vec<CouponResponse>,
    pub totals: TotalsResponse,
}

impl From<CouponReport> for CouponReportResponse {
    fn from(report: CouponReport) -> Self {
        Self {
            coupons: report.coupons.into_iter().map(Into::into).collect(),
            totals: report.totals.into(),
        }
    }
}

/// Coupon Report
///
/// `status` is `all`, `redeemed` or `unredeemed`; `from` and `to` are
/// inclusive creation dates (`YYYY-MM-DD`) in the configured time zone.
#[endpoint(
    tags("reports"),
    summary = "Coupon Report",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Matching coupons with totals"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad filter"),
        (status_code = StatusCode::FORBIDDEN, description = "Admins only"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CouponReportResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let filter = ReportFilter {
        status: status
            .into_inner()
            .unwrap_or_default()
            .parse::<StatusFilter>()
            .or_400("could not parse \"status\" query parameter")?,
        created_from: from.into_date("from")?,
        created_to: to.into_date("to")?,
    };

    let report = state
        .app
        .reports
        .coupon_report(session, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use giftqr_app::{
        auth::Role,
        domain::reports::{MockReportsService, ReportsServiceError},
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    fn make_service(reports: MockReportsService) -> Service {
        signed_in_service(
            Mocks {
                reports,
                ..Mocks::default()
            },
            session(Role::Admin, None),
            Router::with_path("reports/coupons").get(handler),
        )
    }

    #[tokio::test]
    async fn test_report_parses_filters() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_coupon_report()
            .once()
            .withf(|_, filter| {
                *filter
                    == ReportFilter {
                        status: StatusFilter::Redeemed,
                        created_from: Some(date(2026, 10, 1)),
                        created_to: Some(date(2026, 10, 17)),
                    }
            })
            .return_once(|_, _| {
                Ok(CouponReport {
                    coupons: Vec::new(),
                    totals: ReportTotals::default(),
                })
            });

        let mut res = TestClient::get(
            "http://example.com/reports/coupons?status=redeemed&from=2026-10-01&to=2026-10-17",
        )
        .send(&make_service(reports))
        .await;

        let body: CouponReportResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.totals.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_report_without_filters_lists_everything() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_coupon_report()
            .once()
            .withf(|_, filter| *filter == ReportFilter::default())
            .return_once(|_, _| {
                Ok(CouponReport {
                    coupons: Vec::new(),
                    totals: ReportTotals::default(),
                })
            });

        let res = TestClient::get("http://example.com/reports/coupons")
            .send(&make_service(reports))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_date_returns_400() -> TestResult {
        let mut reports = MockReportsService::new();

        reports.expect_coupon_report().never();

        let res = TestClient::get("http://example.com/reports/coupons?from=17/10/2026")
            .send(&make_service(reports))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_inverted_range_returns_400() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_coupon_report()
            .once()
            .return_once(|_, _| Err(ReportsServiceError::InvalidRange));

        let res = TestClient::get(
            "http://example.com/reports/coupons?from=2026-10-17&to=2026-10-01",
        )
        .send(&make_service(reports))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
