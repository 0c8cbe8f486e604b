//! Identity service client (password sign-in, bearer tokens, sign-up).

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    backend::{AccessToken, BackendConfig},
};

/// Token and user returned by a successful password sign-in.
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub token: AccessToken,
    pub user: UserUuid,
}

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an email and password for a bearer token.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError>;

    /// Resolve the user a bearer token belongs to.
    async fn get_user(&self, token: &AccessToken) -> Result<UserUuid, IdentityError>;

    /// Invalidate a bearer token.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityError>;

    /// Register a new identity, returning its user id.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserUuid, IdentityError>;
}

/// HTTP client for the hosted identity service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    config: BackendConfig,
    http: Client,
}

impl IdentityClient {
    /// Create a new client from the backend configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, IdentityError> {
        let http = config.http_client()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url())
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let parsed: TokenResponse = response.json().await?;

                Ok(IdentitySession {
                    token: AccessToken::new(parsed.access_token),
                    user: UserUuid::from_uuid(parsed.user.id),
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            }
            status => Err(unexpected("sign-in", status, response).await),
        }
    }

    async fn get_user(&self, token: &AccessToken) -> Result<UserUuid, IdentityError> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.expose())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let parsed: UserResponse = response.json().await?;

                Ok(UserUuid::from_uuid(parsed.id))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(IdentityError::InvalidToken)
            }
            status => Err(unexpected("user lookup", status, response).await),
        }
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.expose())
            .send()
            .await?;

        match response.status() {
            // An already invalid token is as signed out as it gets.
            status
                if status.is_success()
                    || status == StatusCode::UNAUTHORIZED
                    || status == StatusCode::FORBIDDEN
                    || status == StatusCode::NOT_FOUND =>
            {
                Ok(())
            }
            status => Err(unexpected("sign-out", status, response).await),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserUuid, IdentityError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .http
            .post(self.url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let parsed: SignUpResponse = response.json().await?;

            return parsed
                .user_id()
                .map(UserUuid::from_uuid)
                .ok_or_else(|| {
                    IdentityError::UnexpectedResponse("sign-up response had no user id".to_string())
                });
        }

        let text = response.text().await.unwrap_or_default();

        if is_already_registered(status, &text) {
            return Err(IdentityError::AlreadyRegistered);
        }

        Err(IdentityError::UnexpectedResponse(format!(
            "sign-up request failed with status {status}: {text}"
        )))
    }
}

async fn unexpected(
    operation: &str,
    status: StatusCode,
    response: reqwest::Response,
) -> IdentityError {
    let text = response.text().await.unwrap_or_default();

    IdentityError::UnexpectedResponse(format!(
        "{operation} request failed with status {status}: {text}"
    ))
}

fn is_already_registered(status: StatusCode, body: &str) -> bool {
    let body = body.to_ascii_lowercase();

    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT
    ) && (body.contains("already registered") || body.contains("user_already_exists"))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
}

/// Sign-up answers with the user itself, or wraps it when email
/// confirmation is pending.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    id: Option<Uuid>,
    user: Option<UserResponse>,
}

impl SignUpResponse {
    fn user_id(&self) -> Option<Uuid> {
        self.id.or_else(|| self.user.as_ref().map(|user| user.id))
    }
}

/// Errors that can occur when communicating with the identity service.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("email already registered")]
    AlreadyRegistered,

    #[error("unexpected response from identity service: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn sign_up_response_reads_top_level_id() -> TestResult {
        let id = Uuid::now_v7();
        let parsed: SignUpResponse = serde_json::from_value(serde_json::json!({
            "id": id,
            "email": "nuevo@example.com",
        }))?;

        assert_eq!(parsed.user_id(), Some(id));

        Ok(())
    }

    #[test]
    fn sign_up_response_reads_nested_user_id() -> TestResult {
        let id = Uuid::now_v7();
        let parsed: SignUpResponse = serde_json::from_value(serde_json::json!({
            "user": { "id": id },
            "session": null,
        }))?;

        assert_eq!(parsed.user_id(), Some(id));

        Ok(())
    }

    #[test]
    fn duplicate_email_bodies_are_recognised() {
        assert!(is_already_registered(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#
        ));
        assert!(!is_already_registered(
            StatusCode::INTERNAL_SERVER_ERROR,
            "User already registered"
        ));
        assert!(!is_already_registered(
            StatusCode::BAD_REQUEST,
            "Password should be at least 6 characters"
        ));
    }
}
