//! Create User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use giftqr_app::{
    auth::Role,
    domain::{master_data::models::BranchId, users::data::NewUser},
};

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, into_status_error},
};

/// Create User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateUserRequest {
    pub email: String,
    pub username: String,

    /// `Admin`, `Creator` or `Cashier`
    pub role: String,

    /// Required for Creator and Cashier
    #[serde(default)]
    pub branch_id: Option<i64>,

    #[serde(default)]
    pub phone_number: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = StatusError;

    fn try_from(request: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(NewUser {
            email: request.email,
            username: request.username,
            role: request.role.parse::<Role>().or_400("Unknown role")?,
            branch: request.branch_id.map(BranchId::from_i64),
            phone_number: request.phone_number,
        })
    }
}

/// User Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserCreatedResponse {
    pub user: UserResponse,

    /// Shown once; the user should change it after first sign-in
    pub temporary_password: String,
}

/// Create User Handler
#[endpoint(
    tags("users"),
    summary = "Create User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admins only"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateUserRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let created = state
        .app
        .users
        .create_user(session, json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(UserCreatedResponse {
        user: created.user.into(),
        temporary_password: created.temporary_password.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use giftqr_app::{
        auth::UserUuid,
        backend::BackendError,
        domain::users::{
            MockUsersService, UsersServiceError,
            models::{CreatedUser, UserSummary},
        },
    };

    use crate::test_helpers::{Mocks, session, signed_in_service};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        signed_in_service(
            Mocks {
                users,
                ..Mocks::default()
            },
            session(Role::Admin, None),
            Router::with_path("users").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_returns_temporary_password_once() -> TestResult {
        let id = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_create_user()
            .once()
            .withf(|_, user| user.role == Role::Cashier && user.branch == Some(BranchId::from_i64(2)))
            .return_once(move |_, user| {
                Ok(CreatedUser {
                    user: UserSummary {
                        id,
                        username: user.username,
                        email: Some(user.email),
                        role: Some("Cashier".to_string()),
                        branch: Some("Sucursal Sur".to_string()),
                        phone_number: None,
                    },
                    temporary_password: Zeroizing::new("Tmp0rary".to_string()),
                })
            });

        let mut res = TestClient::post("http://example.com/users")
            .json(&json!({
                "email": "cajero@example.com",
                "username": "Cajero Sur",
                "role": "cashier",
                "branch_id": 2
            }))
            .send(&make_service(users))
            .await;

        let body: UserCreatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.user.id, id.into_uuid());
        assert_eq!(body.temporary_password, "Tmp0rary");

        Ok(())
    }

    #[tokio::test]
    async fn test_orphaned_identity_is_a_server_error() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_create_user().once().return_once(|_, _| {
            Err(UsersServiceError::ProfileIncomplete {
                user: UserUuid::new(),
                source: BackendError::Unexpected {
                    status: 500,
                    message: "insert failed".to_string(),
                },
            })
        });

        let res = TestClient::post("http://example.com/users")
            .json(&json!({
                "email": "nuevo@example.com",
                "username": "Nuevo",
                "role": "Admin"
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_role_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_create_user().never();

        let res = TestClient::post("http://example.com/users")
            .json(&json!({
                "email": "nuevo@example.com",
                "username": "Nuevo",
                "role": "Supervisor"
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
