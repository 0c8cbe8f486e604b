//! Issuer Handlers

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use giftqr_app::domain::master_data::{
    data::IssuerDetails,
    models::{Issuer, IssuerId},
};

use crate::{extensions::*, master_data::into_status_error, state::State};

/// Issuer create/update request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IssuerRequest {
    pub name: String,
}

/// Issuer response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IssuerResponse {
    pub id: i64,
    pub name: String,
}

impl From<Issuer> for IssuerResponse {
    fn from(issuer: Issuer) -> Self {
        Self {
            id: issuer.id.into_i64(),
            name: issuer.name,
        }
    }
}

/// List Issuers
#[endpoint(tags("issuers"), summary = "List Issuers", security(("bearer_auth" = [])))]
pub(crate) async fn index(depot: &mut Depot) -> Result<Json<Vec<IssuerResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let issuers = state
        .app
        .master_data
        .list_issuers(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(issuers.into_iter().map(Into::into).collect()))
}

/// Create Issuer
#[endpoint(
    tags("issuers"),
    summary = "Create Issuer",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::CREATED, description = "Issuer created")),
)]
pub(crate) async fn create(
    json: JsonBody<IssuerRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<IssuerResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let issuer = state
        .app
        .master_data
        .create_issuer(
            session,
            IssuerDetails {
                name: json.into_inner().name,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(issuer.into()))
}

/// Update Issuer
#[endpoint(tags("issuers"), summary = "Update Issuer", security(("bearer_auth" = [])))]
pub(crate) async fn update(
    id: PathParam<i64>,
    json: JsonBody<IssuerRequest>,
    depot: &mut Depot,
) -> Result<Json<IssuerResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let issuer = state
        .app
        .master_data
        .update_issuer(
            session,
            IssuerId::from_i64(id.into_inner()),
            IssuerDetails {
                name: json.into_inner().name,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(issuer.into()))
}

/// Delete Issuer
#[endpoint(
    tags("issuers"),
    summary = "Delete Issuer",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::NO_CONTENT, description = "Issuer deleted")),
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
        .delete_issuer(session, IssuerId::from_i64(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use giftqr_app::{
        auth::Role,
        domain::master_data::{MasterDataServiceError, MockMasterDataService},
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    #[tokio::test]
    async fn test_duplicate_issuer_returns_409() -> TestResult {
        let mut master_data = MockMasterDataService::new();

        master_data
            .expect_create_issuer()
            .once()
            .withf(|_, details| details.name == "Mercadeo")
            .return_once(|_, _| Err(MasterDataServiceError::AlreadyExists));

        let service = signed_in_service(
            Mocks {
                master_data,
                ..Mocks::default()
            },
            session(Role::Admin, None),
            Router::with_path("issuers").post(create),
        );

        let res = TestClient::post("http://example.com/issuers")
            .json(&json!({ "name": "Mercadeo" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
