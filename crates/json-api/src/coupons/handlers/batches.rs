//! Batch Handlers

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftqr_app::domain::{
    coupons::{data::IssueBatch, models::FaceValue},
    master_data::models::{IssuerId, PromoId},
};

use super::{BatchResponse, attach_file};
use crate::{
    coupons::into_status_error,
    extensions::*,
    observability::record_coupons_issued,
    state::State,
};

/// Issue Batch Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IssueBatchRequest {
    pub promo_id: i64,

    #[salvo(schema(value_type = String))]
    pub value_usd: Decimal,

    /// Defaults to the USD value
    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub value_pab: Option<Decimal>,

    pub validity_days: u32,

    /// Branch names the coupons are restricted to; empty for every branch
    #[serde(default)]
    pub branch_names: Vec<String>,

    pub issuer_id: i64,
    pub count: u32,

    #[serde(default)]
    pub name: Option<String>,
}

impl From<IssueBatchRequest> for IssueBatch {
    fn from(request: IssueBatchRequest) -> Self {
        IssueBatch {
            promo: PromoId::from_i64(request.promo_id),
            face_value: FaceValue {
                usd: request.value_usd,
                pab: request.value_pab.unwrap_or(request.value_usd),
            },
            validity_days: request.validity_days,
            branch_names: request.branch_names,
            issuer: IssuerId::from_i64(request.issuer_id),
            count: request.count,
            name: request.name,
        }
    }
}

/// Issue Batch
#[endpoint(
    tags("batches"),
    summary = "Issue Batch",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Batch issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admins and creators only"),
    ),
)]
pub(crate) async fn create(
    json: JsonBody<IssueBatchRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BatchResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let issued = state
        .app
        .coupons
        .issue_batch(session, json.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    record_coupons_issued(issued.coupons.len());

    res.status_code(StatusCode::CREATED);

    Ok(Json(issued.into()))
}

/// Get Batch
#[endpoint(tags("batches"), summary = "Get Batch", security(("bearer_auth" = [])))]
pub(crate) async fn show(
    batch: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BatchResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let batch = state
        .app
        .coupons
        .get_batch(session, batch.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(batch.into()))
}

/// Print Batch Cards
///
/// One PDF page per coupon, in consecutive order.
#[endpoint(
    tags("batches"),
    summary = "Print Batch Cards",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "PDF document"),
        (status_code = StatusCode::NOT_FOUND, description = "Batch not found"),
    ),
)]
pub(crate) async fn cards(
    batch: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let batch = batch.into_inner();

    let contents = state
        .app
        .coupons
        .batch_cards(session, batch.into())
        .await
        .map_err(into_status_error)?;

    let renderer = Arc::clone(&state.app.cards);

    let pdf = tokio::task::spawn_blocking(move || renderer.render_print_document(&contents))
        .await
        .or_500("card rendering task failed")?
        .or_500("failed to render batch cards")?;

    attach_file(res, "application/pdf", &format!("batch-{batch}.pdf"), pdf)
}
