//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info, warn};

use crate::{
    auth::{
        AuthServiceError, Credentials, IdentityProvider, ProfilesRepository, SessionContext,
    },
    backend::AccessToken,
};

#[derive(Clone)]
pub struct DefaultAuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfilesRepository>,
}

impl DefaultAuthService {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfilesRepository>) -> Self {
        Self { identity, profiles }
    }

    async fn force_sign_out(&self, token: &AccessToken) {
        if let Err(source) = self.identity.sign_out(token).await {
            error!("failed to sign out session without profile: {source}");
        }
    }
}

impl std::fmt::Debug for DefaultAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultAuthService").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthService for DefaultAuthService {
    async fn sign_in(&self, credentials: Credentials) -> Result<SessionContext, AuthServiceError> {
        if !credentials.is_complete() {
            return Err(AuthServiceError::MissingCredentials);
        }

        let signed_in = self
            .identity
            .sign_in_with_password(credentials.email.trim(), &credentials.password)
            .await?;

        match self
            .profiles
            .find_profile(&signed_in.token, signed_in.user)
            .await
        {
            Ok(Some(profile)) => {
                info!(user = %profile.id, role = %profile.role, "user signed in");

                Ok(SessionContext::new(profile, signed_in.token))
            }
            Ok(None) => {
                warn!(user = %signed_in.user, "signed in without a profile, forcing sign-out");

                self.force_sign_out(&signed_in.token).await;

                Err(AuthServiceError::ProfileMissing)
            }
            Err(source) => {
                self.force_sign_out(&signed_in.token).await;

                Err(source.into())
            }
        }
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<SessionContext, AuthServiceError> {
        let token = AccessToken::new(bearer_token);
        let user = self.identity.get_user(&token).await?;

        let profile = self
            .profiles
            .find_profile(&token, user)
            .await?
            .ok_or(AuthServiceError::ProfileMissing)?;

        Ok(SessionContext::new(profile, token))
    }

    async fn sign_out(&self, session: &SessionContext) -> Result<(), AuthServiceError> {
        self.identity.sign_out(session.token()).await?;

        info!(user = %session.user(), "user signed out");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in with email and password, loading the caller's profile.
    async fn sign_in(&self, credentials: Credentials) -> Result<SessionContext, AuthServiceError>;

    /// Resolve a bearer token into a session.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<SessionContext, AuthServiceError>;

    /// Invalidate the session's token.
    async fn sign_out(&self, session: &SessionContext) -> Result<(), AuthServiceError>;
}
