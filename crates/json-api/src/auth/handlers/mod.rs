//! Auth Handlers

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftqr_app::auth::Profile;

/// Signed-in user's profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: String,

    /// `Admin`, `Creator` or `Cashier`
    pub role: String,

    pub branch_id: Option<i64>,
    pub phone_number: Option<String>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.into_uuid(),
            email: profile.email.clone(),
            username: profile.username.clone(),
            role: profile.role.to_string(),
            branch_id: profile.branch.map(|branch| branch.into_i64()),
            phone_number: profile.phone_number.clone(),
        }
    }
}
