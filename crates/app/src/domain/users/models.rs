//! User Models

use serde::Deserialize;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::auth::UserUuid;

/// User listing row with its role and branch names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserUuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub branch: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserSummaryRecord {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub roles: Option<NamedRole>,
    pub branches: Option<NamedBranch>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedRole {
    pub role_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedBranch {
    pub name: String,
}

impl From<UserSummaryRecord> for UserSummary {
    fn from(record: UserSummaryRecord) -> Self {
        Self {
            id: UserUuid::from_uuid(record.id),
            username: record.username.unwrap_or_default(),
            email: record.email,
            role: record.roles.map(|role| role.role_name),
            branch: record.branches.map(|branch| branch.name),
            phone_number: record.phone_number,
        }
    }
}

/// A freshly registered user and the one-time temporary password.
pub struct CreatedUser {
    pub user: UserSummary,
    pub temporary_password: Zeroizing<String>,
}

impl std::fmt::Debug for CreatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedUser")
            .field("user", &self.user)
            .field("temporary_password", &"<redacted>")
            .finish()
    }
}
