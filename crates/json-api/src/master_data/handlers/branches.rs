//! Branch Handlers

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
    data::BranchDetails,
    models::{Branch, BranchId},
};

use crate::{extensions::*, master_data::into_status_error, state::State};

/// Branch create/update request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BranchRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<BranchRequest> for BranchDetails {
    fn from(request: BranchRequest) -> Self {
        BranchDetails {
            name: request.name,
            address: request.address,
        }
    }
}

/// Branch Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BranchResponse {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

impl From<Branch> for BranchResponse {
    fn from(branch: Branch) -> Self {
        Self {
            id: branch.id.into_i64(),
            name: branch.name,
            address: branch.address,
        }
    }
}

/// List Branches
#[endpoint(tags("branches"), summary = "List Branches", security(("bearer_auth" = [])))]
pub(crate) async fn index(depot: &mut Depot) -> Result<Json<Vec<BranchResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let branches = state
        .app
        .master_data
        .list_branches(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(branches.into_iter().map(Into::into).collect()))
}

/// Create Branch
#[endpoint(
    tags("branches"),
    summary = "Create Branch",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Branch created"),
        (status_code = StatusCode::CONFLICT, description = "Branch already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admins only"),
    ),
)]
pub(crate) async fn create(
    json: JsonBody<BranchRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BranchResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let branch = state
        .app
        .master_data
        .create_branch(session, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(branch.into()))
}

/// Update Branch
#[endpoint(tags("branches"), summary = "Update Branch", security(("bearer_auth" = [])))]
pub(crate) async fn update(
    id: PathParam<i64>,
    json: JsonBody<BranchRequest>,
    depot: &mut Depot,
) -> Result<Json<BranchResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let branch = state
        .app
        .master_data
        .update_branch(
            session,
            BranchId::from_i64(id.into_inner()),
            json.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(branch.into()))
}

/// Delete Branch
#[endpoint(
    tags("branches"),
    summary = "Delete Branch",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Branch deleted"),
        (status_code = StatusCode::CONFLICT, description = "Branch still in use"),
        (status_code = StatusCode::NOT_FOUND, description = "Branch not found"),
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
        .delete_branch(session, BranchId::from_i64(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
