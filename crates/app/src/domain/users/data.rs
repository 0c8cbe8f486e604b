//! User Data

use serde::Serialize;

use crate::{
    auth::{Role, UserUuid},
    domain::{
        master_data::models::{BranchId, RoleId},
        users::errors::UsersServiceError,
    },
};

/// Details of a user to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub role: Role,
    pub branch: Option<BranchId>,
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Trim fields and check the role's branch requirement.
    pub(crate) fn validated(&self) -> Result<Self, UsersServiceError> {
        let email = self.email.trim();

        if email.is_empty() {
            return Err(UsersServiceError::MissingRequiredData("email"));
        }

        let username = self.username.trim();

        if username.is_empty() {
            return Err(UsersServiceError::MissingRequiredData("username"));
        }

        if self.role.requires_branch() && self.branch.is_none() {
            return Err(UsersServiceError::BranchRequired(self.role));
        }

        Ok(Self {
            email: email.to_string(),
            username: username.to_string(),
            role: self.role,
            branch: self.branch,
            phone_number: self
                .phone_number
                .as_deref()
                .map(str::trim)
                .filter(|phone| !phone.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileRow<'a> {
    pub id: UserUuid,
    pub email: &'a str,
    pub username: &'a str,
    pub role_id: RoleId,
    pub branch_id: Option<BranchId>,
    pub phone_number: Option<&'a str>,
}

impl<'a> ProfileRow<'a> {
    pub(crate) fn new(id: UserUuid, user: &'a NewUser, role_id: RoleId) -> Self {
        Self {
            id,
            email: &user.email,
            username: &user.username,
            role_id,
            branch_id: user.branch,
            phone_number: user.phone_number.as_deref(),
        }
    }
}
