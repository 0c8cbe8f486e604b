//! User Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, into_status_error},
};

/// List Users
#[endpoint(tags("users"), summary = "List Users", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let users = state
        .app
        .users
        .list_users(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}
