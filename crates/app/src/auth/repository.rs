//! Profiles repository.

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    auth::{Profile, UserUuid, models::ProfileRecord},
    backend::{AccessToken, BackendError, Query, RestClient},
};

pub(crate) const PROFILES_TABLE: &str = "profiles";

#[automock]
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    /// Load a user's profile with its role. Missing and incomplete profiles
    /// both come back as `None`.
    async fn find_profile(
        &self,
        token: &AccessToken,
        user: UserUuid,
    ) -> Result<Option<Profile>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct RestProfilesRepository {
    client: RestClient,
}

impl RestProfilesRepository {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfilesRepository for RestProfilesRepository {
    async fn find_profile(
        &self,
        token: &AccessToken,
        user: UserUuid,
    ) -> Result<Option<Profile>, BackendError> {
        let records: Vec<ProfileRecord> = self
            .client
            .select(
                token,
                PROFILES_TABLE,
                &Query::new()
                    .select("*,roles(role_name)")
                    .eq("id", user)
                    .limit(1),
            )
            .await?;

        let Some(record) = records.into_iter().next() else {
            return Ok(None);
        };

        match Profile::try_from(record) {
            Ok(profile) => Ok(Some(profile)),
            Err(reason) => {
                warn!(user = %user, "ignoring incomplete profile: {reason}");

                Ok(None)
            }
        }
    }
}
