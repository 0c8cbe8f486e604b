//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use giftqr_app::auth::Credentials;

use crate::{
    auth::{ProfileResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    pub profile: ProfileResponse,
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Sign in with email and password",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing credentials"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::FORBIDDEN, description = "Account has no profile"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .auth
        .sign_in(Credentials::new(request.email, request.password))
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoginResponse {
        access_token: session.token().expose().to_string(),
        profile: session.profile().into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use giftqr_app::auth::{AuthServiceError, MockAuthService, Role};

    use crate::test_helpers::{Mocks, TEST_TOKEN, anonymous_service, session};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        anonymous_service(
            Mocks {
                auth,
                ..Mocks::default()
            },
            Router::with_path("auth/login").post(handler),
        )
    }

    #[tokio::test]
    async fn test_login_returns_token_and_profile() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_sign_in()
            .once()
            .withf(|credentials| credentials.email == "cajero@example.com")
            .return_once(|_| Ok(session(Role::Cashier, Some(3))));

        let mut res = TestClient::post("http://example.com/auth/login")
            .json(&json!({ "email": "cajero@example.com", "password": "secret" }))
            .send(&make_service(auth))
            .await;

        let body: LoginResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.access_token, TEST_TOKEN);
        assert_eq!(body.profile.role, "Cashier");
        assert_eq!(body.profile.branch_id, Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn test_login_with_bad_password_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_sign_in()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidCredentials));

        let res = TestClient::post("http://example.com/auth/login")
            .json(&json!({ "email": "cajero@example.com", "password": "wrong" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
