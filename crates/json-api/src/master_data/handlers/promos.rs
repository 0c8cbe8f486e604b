//! Promotion Type Handlers

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use giftqr_app::domain::master_data::{
    data::PromoDetails,
    models::{Promo, PromoId, PromoKind},
};

use crate::{extensions::*, master_data::into_status_error, state::State};

/// Promotion type create/update request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoRequest {
    pub name: String,

    /// `percentage`, `cash_value` or `product`
    pub kind: String,

    /// Decimal amount, e.g. `"10"` or `"25.00"`
    #[salvo(schema(value_type = String))]
    pub value: Decimal,

    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<PromoRequest> for PromoDetails {
    type Error = StatusError;

    fn try_from(request: PromoRequest) -> Result<Self, Self::Error> {
        Ok(PromoDetails {
            name: request.name,
            kind: request.kind.parse::<PromoKind>().or_400("Unknown promotion kind")?,
            value: request.value,
            description: request.description,
        })
    }
}

/// Promotion type response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoResponse {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub value: String,
    pub description: Option<String>,

    /// Text printed on coupon cards
    pub card_text: String,
}

impl From<Promo> for PromoResponse {
    fn from(promo: Promo) -> Self {
        let card_text = promo.card_description();

        Self {
            id: promo.id.into_i64(),
            name: promo.name,
            kind: promo.kind.to_string(),
            value: promo.value.to_string(),
            description: promo.description,
            card_text,
        }
    }
}

/// List Promotion Types
#[endpoint(tags("promos"), summary = "List Promotion Types", security(("bearer_auth" = [])))]
pub(crate) async fn index(depot: &mut Depot) -> Result<Json<Vec<PromoResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let promos = state
        .app
        .master_data
        .list_promos(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(promos.into_iter().map(Into::into).collect()))
}

/// Create Promotion Type
#[endpoint(
    tags("promos"),
    summary = "Create Promotion Type",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promotion type created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn create(
    json: JsonBody<PromoRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PromoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let promo = state
        .app
        .master_data
        .create_promo(session, json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(promo.into()))
}

/// Update Promotion Type
#[endpoint(tags("promos"), summary = "Update Promotion Type", security(("bearer_auth" = [])))]
pub(crate) async fn update(
    id: PathParam<i64>,
    json: JsonBody<PromoRequest>,
    depot: &mut Depot,
) -> Result<Json<PromoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let promo = state
        .app
        .master_data
        .update_promo(
            session,
            PromoId::from_i64(id.into_inner()),
            json.into_inner().try_into()?,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(promo.into()))
}

/// Delete Promotion Type
#[endpoint(
    tags("promos"),
    summary = "Delete Promotion Type",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Promotion type deleted"),
        (status_code = StatusCode::CONFLICT, description = "Promotion type still in use"),
    ),
)]
pub(crate) async fn delete(
    id: PathParam<i64>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    state
        .app
        .master_data
        .delete_promo(session, PromoId::from_i64(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use giftqr_app::{
        auth::Role,
        domain::master_data::{MasterDataServiceError, MockMasterDataService},
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    fn make_service(master_data: MockMasterDataService) -> Service {
        signed_in_service(
            Mocks {
                master_data,
                ..Mocks::default()
            },
            session(Role::Admin, None),
            Router::with_path("promos").get(index).post(create),
        )
    }

    #[tokio::test]
    async fn test_create_parses_kind_and_value() -> TestResult {
        let mut master_data = MockMasterDataService::new();

        master_data
            .expect_create_promo()
            .once()
            .withf(|_, details| {
                details.kind == PromoKind::Percentage && details.value == Decimal::from(15)
            })
            .return_once(|_, details| {
                Ok(Promo {
                    id: PromoId::from_i64(4),
                    name: details.name,
                    kind: details.kind,
                    value: details.value,
                    description: None,
                })
            });

        let mut res = TestClient::post("http://example.com/promos")
            .json(&json!({ "name": "Aniversario", "kind": "percentage", "value": "15" }))
            .send(&make_service(master_data))
            .await;

        let body: PromoResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.card_text, "15% de descuento");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_kind_returns_400() -> TestResult {
        let mut master_data = MockMasterDataService::new();

        master_data.expect_create_promo().never();

        let res = TestClient::post("http://example.com/promos")
            .json(&json!({ "name": "Raro", "kind": "voucher", "value": "5" }))
            .send(&make_service(master_data))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_percentage_returns_400() -> TestResult {
        let mut master_data = MockMasterDataService::new();

        master_data.expect_create_promo().once().return_once(|_, _| {
            Err(MasterDataServiceError::InvalidData(
                "percentage must be greater than 0 and at most 100".to_string(),
            ))
        });

        let res = TestClient::post("http://example.com/promos")
            .json(&json!({ "name": "Excesivo", "kind": "percentage", "value": "150" }))
            .send(&make_service(master_data))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
