//! Auth data models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{backend::AccessToken, domain::master_data::models::BranchId, ids::TypedUuid};

/// User UUID, shared by the identity service and the profiles table.
pub type UserUuid = TypedUuid<Profile>;

/// Access level of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Creator,
    Cashier,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Creator => "Creator",
            Self::Cashier => "Cashier",
        }
    }

    /// Whether users with this role must be assigned to a branch.
    #[must_use]
    pub const fn requires_branch(self) -> bool {
        matches!(self, Self::Creator | Self::Cashier)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "creator" => Ok(Self::Creator),
            "cashier" => Ok(Self::Cashier),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

/// Profile of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: UserUuid,
    pub email: Option<String>,
    pub username: String,
    pub role: Role,
    pub branch: Option<BranchId>,
    pub phone_number: Option<String>,
}

/// Profile row as returned with its role embedded.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub branch_id: Option<i64>,
    pub phone_number: Option<String>,
    pub roles: Option<RoleNameRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleNameRecord {
    pub role_name: String,
}

/// Reasons a stored profile cannot back a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompleteProfile {
    #[error("profile has no role")]
    MissingRole,

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = IncompleteProfile;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let role = record
            .roles
            .ok_or(IncompleteProfile::MissingRole)?
            .role_name
            .parse::<Role>()?;

        let username = record
            .username
            .filter(|name| !name.trim().is_empty())
            .or_else(|| record.email.clone())
            .unwrap_or_default();

        Ok(Self {
            id: UserUuid::from_uuid(record.id),
            email: record.email,
            username,
            role,
            branch: record.branch_id.map(BranchId::from_i64),
            phone_number: record.phone_number,
        })
    }
}

/// Email and password submitted at sign-in.
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raised when a session lacks the role an operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role {actual} may not perform this operation")]
pub struct AccessDenied {
    pub actual: Role,
}

/// Request-scoped identity of the caller.
///
/// Built once when a bearer token is authenticated and handed to every
/// service call, carrying the token used for the caller's backend requests.
#[derive(Debug, Clone)]
pub struct SessionContext {
    profile: Profile,
    token: AccessToken,
}

impl SessionContext {
    #[must_use]
    pub fn new(profile: Profile, token: AccessToken) -> Self {
        Self { profile, token }
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> UserUuid {
        self.profile.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role
    }

    #[must_use]
    pub fn branch(&self) -> Option<BranchId> {
        self.profile.branch
    }

    /// Allow the call only when the caller holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AccessDenied> {
        if roles.contains(&self.profile.role) {
            return Ok(());
        }

        Err(AccessDenied {
            actual: self.profile.role,
        })
    }
}
