//! Role Handlers

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use giftqr_app::domain::master_data::models::RoleRecord;

use crate::{extensions::*, master_data::into_status_error, state::State};

/// Role response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RoleResponse {
    pub id: i64,
    pub name: String,
}

impl From<RoleRecord> for RoleResponse {
    fn from(role: RoleRecord) -> Self {
        Self {
            id: role.id.into_i64(),
            name: role.name,
        }
    }
}

/// List Roles
#[endpoint(tags("roles"), summary = "List Roles", security(("bearer_auth" = [])))]
pub(crate) async fn index(depot: &mut Depot) -> Result<Json<Vec<RoleResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let roles = state
        .app
        .master_data
        .list_roles(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(roles.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use giftqr_app::{
        auth::Role,
        domain::master_data::{MockMasterDataService, models::RoleId},
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    #[tokio::test]
    async fn test_roles_are_listed() -> TestResult {
        let mut master_data = MockMasterDataService::new();

        master_data.expect_list_roles().once().return_once(|_| {
            Ok(vec![RoleRecord {
                id: RoleId::from_i64(1),
                name: "Admin".to_string(),
            }])
        });

        let body: Vec<RoleResponse> = TestClient::get("http://example.com/roles")
            .send(&signed_in_service(
                Mocks {
                    master_data,
                    ..Mocks::default()
                },
                session(Role::Cashier, Some(1)),
                Router::with_path("roles").get(index),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.first().map(|role| role.name.as_str()), Some("Admin"));

        Ok(())
    }
}
