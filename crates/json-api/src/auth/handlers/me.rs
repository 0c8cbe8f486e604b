//! Current Profile Handler

use salvo::prelude::*;

use crate::{auth::ProfileResponse, extensions::*};

/// Current Profile Handler
#[endpoint(
    tags("auth"),
    summary = "Current user's profile",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let session = depot.session_or_401()?;

    Ok(Json(session.profile().into()))
}
