//! User Handlers

pub(crate) mod create;
pub(crate) mod index;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftqr_app::domain::users::models::UserSummary;

/// User listing entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,

    /// Branch name, absent for users without a branch
    pub branch: Option<String>,

    pub phone_number: Option<String>,
}

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.into_uuid(),
            username: user.username,
            email: user.email,
            role: user.role,
            branch: user.branch,
            phone_number: user.phone_number,
        }
    }
}
