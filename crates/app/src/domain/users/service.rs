//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::{
    auth::{IdentityProvider, Role, SessionContext},
    domain::{
        master_data::MasterDataRepository,
        users::{
            UsersRepository,
            data::NewUser,
            errors::UsersServiceError,
            models::{CreatedUser, UserSummary},
        },
    },
};

const TEMPORARY_PASSWORD_LENGTH: usize = 16;

const ADMINS: &[Role] = &[Role::Admin];

fn temporary_password() -> Zeroizing<String> {
    Zeroizing::new(
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TEMPORARY_PASSWORD_LENGTH)
            .map(char::from)
            .collect(),
    )
}

#[derive(Clone)]
pub struct DefaultUsersService {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UsersRepository>,
    master_data: Arc<dyn MasterDataRepository>,
}

impl DefaultUsersService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UsersRepository>,
        master_data: Arc<dyn MasterDataRepository>,
    ) -> Self {
        Self {
            identity,
            users,
            master_data,
        }
    }
}

impl std::fmt::Debug for DefaultUsersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultUsersService").finish_non_exhaustive()
    }
}

#[async_trait]
impl UsersService for DefaultUsersService {
    async fn list_users(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<UserSummary>, UsersServiceError> {
        session.require_any(ADMINS)?;

        Ok(self.users.list_users(session.token()).await?)
    }

    async fn create_user(
        &self,
        session: &SessionContext,
        user: NewUser,
    ) -> Result<CreatedUser, UsersServiceError> {
        session.require_any(ADMINS)?;

        let user = user.validated()?;
        let token = session.token();

        let role_id = self
            .master_data
            .list_roles(token)
            .await?
            .into_iter()
            .find(|record| record.role().is_ok_and(|role| role == user.role))
            .map(|record| record.id)
            .ok_or(UsersServiceError::UnknownRole(user.role))?;

        if let Some(branch) = user.branch {
            let branches = self.master_data.list_branches(token).await?;

            if !branches.iter().any(|known| known.id == branch) {
                return Err(UsersServiceError::InvalidReference);
            }
        }

        let temporary_password = temporary_password();
        let id = self.identity.sign_up(&user.email, &temporary_password).await?;

        let summary = self
            .users
            .insert_profile(token, id, role_id, &user)
            .await
            .map_err(|source| {
                error!(user = %id, "identity registered but profile insert failed: {source}");

                UsersServiceError::ProfileIncomplete { user: id, source }
            })?;

        info!(user = %id, role = %user.role, created_by = %session.user(), "user created");

        Ok(CreatedUser {
            user: summary,
            temporary_password,
        })
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Every profile with role and branch names.
    async fn list_users(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<UserSummary>, UsersServiceError>;

    /// Register an identity with a temporary password and write its profile.
    async fn create_user(
        &self,
        session: &SessionContext,
        user: NewUser,
    ) -> Result<CreatedUser, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::{IdentityError, MockIdentityProvider, UserUuid},
        backend::BackendError,
        domain::{
            master_data::{
                MockMasterDataRepository,
                models::{BranchId, RoleId, RoleRecord},
            },
            users::MockUsersRepository,
        },
        test::fixtures::{branch, session},
    };

    use super::*;

    fn roles() -> Vec<RoleRecord> {
        ["Admin", "Creator", "Cashier"]
            .into_iter()
            .zip(1..)
            .map(|(name, id)| RoleRecord {
                id: RoleId::from_i64(id),
                name: name.to_string(),
            })
            .collect()
    }

    fn master_data() -> MockMasterDataRepository {
        let mut master_data = MockMasterDataRepository::new();

        master_data
            .expect_list_roles()
            .returning(|_| Ok(roles()));
        master_data
            .expect_list_branches()
            .returning(|_| Ok(vec![branch(1, "Norte"), branch(2, "Sur")]));

        master_data
    }

    fn cashier(branch: Option<i64>) -> NewUser {
        NewUser {
            email: "cajero@example.com".to_string(),
            username: "Cajero Sur".to_string(),
            role: Role::Cashier,
            branch: branch.map(BranchId::from_i64),
            phone_number: None,
        }
    }

    fn summary(id: UserUuid) -> UserSummary {
        UserSummary {
            id,
            username: "Cajero Sur".to_string(),
            email: Some("cajero@example.com".to_string()),
            role: Some("Cashier".to_string()),
            branch: Some("Sur".to_string()),
            phone_number: None,
        }
    }

    fn service(
        identity: MockIdentityProvider,
        users: MockUsersRepository,
        master_data: MockMasterDataRepository,
    ) -> DefaultUsersService {
        DefaultUsersService::new(Arc::new(identity), Arc::new(users), Arc::new(master_data))
    }

    #[test]
    fn temporary_passwords_are_alphanumeric() {
        let password = temporary_password();

        assert_eq!(password.len(), TEMPORARY_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(*password, *temporary_password());
    }

    #[tokio::test]
    async fn create_user_registers_identity_then_profile() -> TestResult {
        let id = UserUuid::new();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_up()
            .once()
            .withf(|email, password| email == "cajero@example.com" && password.len() == 16)
            .return_once(move |_, _| Ok(id));

        let mut users = MockUsersRepository::new();

        users
            .expect_insert_profile()
            .once()
            .withf(move |_, user, role, details| {
                *user == id
                    && *role == RoleId::from_i64(3)
                    && details.branch == Some(BranchId::from_i64(2))
            })
            .return_once(move |_, _, _, _| Ok(summary(id)));

        let created = service(identity, users, master_data())
            .create_user(&session(Role::Admin, None), cashier(Some(2)))
            .await?;

        assert_eq!(created.user.id, id);
        assert_eq!(created.user.branch.as_deref(), Some("Sur"));
        assert_eq!(created.temporary_password.len(), 16);

        Ok(())
    }

    #[tokio::test]
    async fn failed_profile_insert_reports_orphaned_identity() {
        let id = UserUuid::new();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_up()
            .once()
            .return_once(move |_, _| Ok(id));

        let mut users = MockUsersRepository::new();

        users.expect_insert_profile().once().return_once(|_, _, _, _| {
            Err(BackendError::Unexpected {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let result = service(identity, users, master_data())
            .create_user(&session(Role::Admin, None), cashier(Some(1)))
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::ProfileIncomplete { user, .. }) if user == id),
            "expected ProfileIncomplete, got {result:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_already_registered() {
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_up()
            .once()
            .return_once(|_, _| Err(IdentityError::AlreadyRegistered));

        let mut users = MockUsersRepository::new();

        users.expect_insert_profile().never();

        let result = service(identity, users, master_data())
            .create_user(&session(Role::Admin, None), cashier(Some(1)))
            .await;

        assert!(matches!(result, Err(UsersServiceError::AlreadyRegistered)));
    }

    #[tokio::test]
    async fn unknown_branch_is_rejected_before_sign_up() {
        let mut identity = MockIdentityProvider::new();

        identity.expect_sign_up().never();

        let result = service(identity, MockUsersRepository::new(), master_data())
            .create_user(&session(Role::Admin, None), cashier(Some(9)))
            .await;

        assert!(matches!(result, Err(UsersServiceError::InvalidReference)));
    }

    #[tokio::test]
    async fn cashier_needs_a_branch() {
        let mut identity = MockIdentityProvider::new();

        identity.expect_sign_up().never();

        let result = service(identity, MockUsersRepository::new(), MockMasterDataRepository::new())
            .create_user(&session(Role::Admin, None), cashier(None))
            .await;

        assert!(matches!(
            result,
            Err(UsersServiceError::BranchRequired(Role::Cashier))
        ));
    }

    #[tokio::test]
    async fn only_admins_manage_users() {
        let result = service(
            MockIdentityProvider::new(),
            MockUsersRepository::new(),
            MockMasterDataRepository::new(),
        )
        .list_users(&session(Role::Creator, Some(1)))
        .await;

        assert!(matches!(result, Err(UsersServiceError::Forbidden(_))));
    }
}
