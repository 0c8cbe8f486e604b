//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{auth::into_status_error, extensions::*, state::State};

/// Logout Handler
#[endpoint(
    tags("auth"),
    summary = "Sign out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Signed out"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    state
        .app
        .auth
        .sign_out(session)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
