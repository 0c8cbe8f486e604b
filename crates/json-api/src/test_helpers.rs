//! Test helpers.

use std::sync::Arc;

use jiff::tz::TimeZone;
use salvo::{affix_state::inject, prelude::*};

use giftqr_app::{
    auth::{MockAuthService, Profile, Role, SessionContext, UserUuid},
    backend::AccessToken,
    cards::{CardConfig, CardRenderer},
    context::AppContext,
    domain::{
        coupons::MockCouponsService, master_data::MockMasterDataService,
        master_data::models::BranchId, reports::MockReportsService, users::MockUsersService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Service mocks backing a test state. Unconfigured mocks reject every call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub auth: MockAuthService,
    pub master_data: MockMasterDataService,
    pub users: MockUsersService,
    pub coupons: MockCouponsService,
    pub reports: MockReportsService,
}

pub(crate) fn session(role: Role, branch: Option<i64>) -> SessionContext {
    SessionContext::new(
        Profile {
            id: UserUuid::new(),
            email: Some("tester@example.com".to_string()),
            username: "tester".to_string(),
            role,
            branch: branch.map(BranchId::from_i64),
            phone_number: None,
        },
        AccessToken::new(TEST_TOKEN),
    )
}

pub(crate) fn state(mocks: Mocks) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(mocks.auth),
        master_data: Arc::new(mocks.master_data),
        users: Arc::new(mocks.users),
        coupons: Arc::new(mocks.coupons),
        reports: Arc::new(mocks.reports),
        cards: Arc::new(CardRenderer::new(&CardConfig::default())),
        time_zone: TimeZone::UTC,
    })
}

struct InjectSession(SessionContext);

#[handler]
impl InjectSession {
    async fn handle(&self, depot: &mut Depot) {
        depot.insert_session(self.0.clone());
    }
}

/// Serve `route` as if `session` had already passed the auth middleware.
pub(crate) fn signed_in_service(mocks: Mocks, session: SessionContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(mocks)))
            .hoop(InjectSession(session))
            .push(route),
    )
}

/// Serve `route` without any session.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state(mocks))).push(route))
}
