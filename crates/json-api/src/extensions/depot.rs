//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use giftqr_app::auth::SessionContext;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_session(&mut self, session: SessionContext);

    fn session_or_401(&self) -> Result<&SessionContext, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_session(&mut self, session: SessionContext) {
        self.inject(session);
    }

    fn session_or_401(&self) -> Result<&SessionContext, StatusError> {
        self.obtain::<SessionContext>()
            .map_err(|_ignored| StatusError::unauthorized().brief("Not signed in"))
    }
}
