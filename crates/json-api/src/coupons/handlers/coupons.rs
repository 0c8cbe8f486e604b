//! Coupon Handlers

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftqr_app::domain::{coupons::data::RedeemCoupon, master_data::models::BranchId};

use super::{CouponResponse, attach_file};
use crate::{
    coupons::into_status_error, extensions::*, observability::record_redemption, state::State,
};

/// Get Coupon
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon found"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
pub(crate) async fn show(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let coupon = state
        .app
        .coupons
        .get_coupon(session, coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

/// Coupon Card
#[endpoint(
    tags("coupons"),
    summary = "Coupon Card",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::OK, description = "PNG image")),
)]
pub(crate) async fn card(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let coupon = coupon.into_inner();

    let content = state
        .app
        .coupons
        .coupon_card(session, coupon.into())
        .await
        .map_err(into_status_error)?;

    let renderer = Arc::clone(&state.app.cards);

    let png = tokio::task::spawn_blocking(move || renderer.render_png(&content))
        .await
        .or_500("card rendering task failed")?
        .or_500("failed to render coupon card")?;

    attach_file(res, "image/png", &format!("coupon-{coupon}.png"), png)
}

/// Redeem Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedeemRequest {
    pub invoice_number: String,

    /// Branch to redeem at; only used for admins
    #[serde(default)]
    pub branch_id: Option<i64>,
}

/// Redeem Coupon
#[endpoint(
    tags("coupons"),
    summary = "Redeem Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon redeemed"),
        (status_code = StatusCode::CONFLICT, description = "Redeemed, expired or not valid at this branch"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
pub(crate) async fn redeem(
    coupon: PathParam<Uuid>,
    json: JsonBody<RedeemRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let request = json.into_inner();

    let redeemed = state
        .app
        .coupons
        .redeem_coupon(
            session,
            RedeemCoupon {
                coupon: coupon.into_inner().into(),
                invoice_number: request.invoice_number,
                branch: request.branch_id.map(BranchId::from_i64),
            },
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    record_redemption("accepted");

    Ok(Json(redeemed.into()))
}

/// Scan Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ScanRequest {
    /// Base64-encoded PNG or JPEG photo of the card
    pub image: String,
}

/// Scan Coupon
///
/// Decodes the QR code in a photo and looks the coupon up.
#[endpoint(
    tags("coupons"),
    summary = "Scan Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon found"),
        (status_code = StatusCode::BAD_REQUEST, description = "No readable coupon code"),
    ),
)]
pub(crate) async fn scan(
    json: JsonBody<ScanRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let image = STANDARD
        .decode(json.into_inner().image.trim())
        .or_400("Image is not valid base64")?;

    let coupon = state
        .app
        .coupons
        .scan_coupon(session, image)
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use giftqr_app::{
        auth::{Role, UserUuid},
        cards::CardContent,
        domain::{
            coupons::{
                CouponsServiceError, MockCouponsService,
                models::{BatchUuid, BranchPermissions, Coupon, CouponUuid, FaceValue, Redemption},
                redemption::{RedemptionRejected, RejectionReason},
            },
            master_data::models::PromoId,
        },
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    fn make_service(coupons: MockCouponsService, role: Role) -> Service {
        signed_in_service(
            Mocks {
                coupons,
                ..Mocks::default()
            },
            session(role, Some(1)),
            Router::with_path("coupons")
                .push(Router::with_path("scan").post(scan))
                .push(
                    Router::with_path("{coupon}")
                        .get(show)
                        .push(Router::with_path("card").get(card))
                        .push(Router::with_path("redemption").post(redeem)),
                ),
        )
    }

    fn coupon(id: CouponUuid) -> Coupon {
        Coupon {
            id,
            batch: BatchUuid::new(),
            consecutive: 42,
            promo: PromoId::from_i64(1),
            allowed_branches: BranchPermissions::unrestricted(),
            face_value: FaceValue::default(),
            expires_on: date(2026, 11, 16),
            redemption: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_show_coupon() -> TestResult {
        let id = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .withf(move |_, coupon| *coupon == id)
            .return_once(move |_, _| Ok(coupon(id)));

        let mut res = TestClient::get(format!("http://example.com/coupons/{id}"))
            .send(&make_service(coupons, Role::Cashier))
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(body.sequence, "No. 000042");
        assert_eq!(body.expires_on, "2026-11-16");
        assert!(!body.redeemed);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_at_session_branch() -> TestResult {
        let id = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_redeem_coupon()
            .once()
            .withf(move |_, request, _| request.coupon == id && request.invoice_number == "F-001")
            .return_once(move |_, request, now| {
                let mut redeemed = coupon(request.coupon);

                redeemed.redemption = Some(Redemption {
                    redeemed_by: UserUuid::new(),
                    branch: BranchId::from_i64(1),
                    redeemed_at: now,
                    invoice_number: Some(request.invoice_number),
                });

                Ok(redeemed)
            });

        let mut res = TestClient::post(format!("http://example.com/coupons/{id}/redemption"))
            .json(&json!({ "invoice_number": "F-001" }))
            .send(&make_service(coupons, Role::Cashier))
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.redeemed);
        assert_eq!(
            body.redemption.and_then(|redemption| redemption.invoice_number),
            Some("F-001".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_redemption_returns_409() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_redeem_coupon().once().return_once(|_, _, _| {
            Err(CouponsServiceError::Rejected(RedemptionRejected {
                reasons: [RejectionReason::AlreadyRedeemed].into_iter().collect(),
            }))
        });

        let res = TestClient::post(format!(
            "http://example.com/coupons/{}/redemption",
            Uuid::now_v7()
        ))
        .json(&json!({ "invoice_number": "F-002" }))
        .send(&make_service(coupons, Role::Cashier))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_scan_rejects_invalid_base64() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_scan_coupon().never();

        let res = TestClient::post("http://example.com/coupons/scan")
            .json(&json!({ "image": "not base64!" }))
            .send(&make_service(coupons, Role::Cashier))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_scan_passes_decoded_image() -> TestResult {
        let id = CouponUuid::new();
        let photo = b"\x89PNG card photo".to_vec();
        let image = STANDARD.encode(&photo);

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_scan_coupon()
            .once()
            .withf(move |_, image| *image == photo)
            .return_once(move |_, _| Ok(coupon(id)));

        let mut res = TestClient::post("http://example.com/coupons/scan")
            .json(&json!({ "image": image }))
            .send(&make_service(coupons, Role::Cashier))
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(body.id, id.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_card_is_a_png() -> TestResult {
        let id = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons.expect_coupon_card().once().return_once(move |_, _| {
            Ok(CardContent {
                payload: id.to_string(),
                description: "10% de descuento".to_string(),
                expiration: "16/11/2026".to_string(),
                sequence: "No. 000042".to_string(),
            })
        });

        let mut res = TestClient::get(format!("http://example.com/coupons/{id}/card"))
            .send(&make_service(coupons, Role::Creator))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body = res.take_bytes(None).await?;

        assert!(body.starts_with(b"\x89PNG"));

        Ok(())
    }
}
