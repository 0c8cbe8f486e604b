//! App Context

use std::sync::Arc;

use jiff::tz::TimeZone;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, DefaultAuthService, IdentityClient, IdentityError, RestProfilesRepository},
    backend::{BackendConfig, BackendError, RestClient},
    cards::{CardConfig, CardRenderer},
    domain::{
        coupons::{CouponsService, DefaultCouponsService, RestCouponsRepository},
        master_data::{DefaultMasterDataService, MasterDataService, RestMasterDataRepository},
        reports::{DefaultReportsService, ReportsService},
        users::{DefaultUsersService, RestUsersRepository, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build backend client")]
    Backend(#[source] BackendError),

    #[error("failed to build identity client")]
    Identity(#[source] IdentityError),
}

/// Everything the services need to reach the backend and render cards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,

    /// Zone in which expiration and report dates are calendar days.
    pub time_zone: TimeZone,

    pub cards: CardConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub master_data: Arc<dyn MasterDataService>,
    pub users: Arc<dyn UsersService>,
    pub coupons: Arc<dyn CouponsService>,
    pub reports: Arc<dyn ReportsService>,
    pub cards: Arc<CardRenderer>,
    pub time_zone: TimeZone,
}

impl AppContext {
    /// Wire services to the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let client = RestClient::new(config.backend.clone()).map_err(AppInitError::Backend)?;
        let identity =
            Arc::new(IdentityClient::new(config.backend.clone()).map_err(AppInitError::Identity)?);

        let profiles = Arc::new(RestProfilesRepository::new(client.clone()));
        let master_data = Arc::new(RestMasterDataRepository::new(client.clone()));
        let coupons = Arc::new(RestCouponsRepository::new(client.clone()));
        let users = Arc::new(RestUsersRepository::new(client));

        info!(
            backend = %config.backend.url,
            time_zone = config.time_zone.iana_name().unwrap_or("fixed"),
            "application context ready"
        );

        Ok(Self {
            auth: Arc::new(DefaultAuthService::new(identity.clone(), profiles)),
            master_data: Arc::new(DefaultMasterDataService::new(master_data.clone())),
            users: Arc::new(DefaultUsersService::new(
                identity,
                users,
                master_data.clone(),
            )),
            coupons: Arc::new(DefaultCouponsService::new(
                coupons.clone(),
                master_data,
                config.time_zone.clone(),
            )),
            reports: Arc::new(DefaultReportsService::new(coupons, config.time_zone.clone())),
            cards: Arc::new(CardRenderer::new(&config.cards)),
            time_zone: config.time_zone,
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}
