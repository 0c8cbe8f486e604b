//! Users repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    backend::{AccessToken, BackendError, Query, RestClient},
    domain::{
        master_data::models::RoleId,
        users::{
            data::{NewUser, ProfileRow},
            models::{UserSummary, UserSummaryRecord},
        },
    },
};

const PROFILES_TABLE: &str = "profiles";
const SUMMARY_COLUMNS: &str = "id,username,email,phone_number,roles(role_name),branches(name)";

#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn list_users(&self, token: &AccessToken) -> Result<Vec<UserSummary>, BackendError>;

    /// Write the profile row for an identity that already exists.
    async fn insert_profile(
        &self,
        token: &AccessToken,
        id: UserUuid,
        role: RoleId,
        user: &NewUser,
    ) -> Result<UserSummary, BackendError>;
}

#[derive(Debug, Clone)]
pub struct RestUsersRepository {
    client: RestClient,
}

impl RestUsersRepository {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersRepository for RestUsersRepository {
    async fn list_users(&self, token: &AccessToken) -> Result<Vec<UserSummary>, BackendError> {
        let records: Vec<UserSummaryRecord> = self
            .client
            .select(
                token,
                PROFILES_TABLE,
                &Query::new().select(SUMMARY_COLUMNS).order_asc("username"),
            )
            .await?;

        Ok(records.into_iter().map(UserSummary::from).collect())
    }

    async fn insert_profile(
        &self,
        token: &AccessToken,
        id: UserUuid,
        role: RoleId,
        user: &NewUser,
    ) -> Result<UserSummary, BackendError> {
        let _: Vec<serde_json::Value> = self
            .client
            .insert(token, PROFILES_TABLE, &ProfileRow::new(id, user, role))
            .await?;

        let records: Vec<UserSummaryRecord> = self
            .client
            .select(
                token,
                PROFILES_TABLE,
                &Query::new().select(SUMMARY_COLUMNS).eq("id", id).limit(1),
            )
            .await?;

        records
            .into_iter()
            .next()
            .map(UserSummary::from)
            .ok_or(BackendError::NotFound)
    }
}
