//! App Router

use salvo::Router;

use crate::{auth, coupons, master_data, reports, users};

/// Sign-in is public; every other route runs behind the bearer token middleware.
pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("auth/login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("auth")
                        .push(Router::with_path("logout").post(auth::logout::handler))
                        .push(Router::with_path("me").get(auth::me::handler)),
                )
                .push(
                    Router::with_path("branches")
                        .get(master_data::branches::index)
                        .post(master_data::branches::create)
                        .push(
                            Router::with_path("{id}")
                                .put(master_data::branches::update)
                                .delete(master_data::branches::delete),
                        ),
                )
                .push(
                    Router::with_path("promos")
                        .get(master_data::promos::index)
                        .post(master_data::promos::create)
                        .push(
                            Router::with_path("{id}")
                                .put(master_data::promos::update)
                                .delete(master_data::promos::delete),
                        ),
                )
                .push(
                    Router::with_path("issuers")
                        .get(master_data::issuers::index)
                        .post(master_data::issuers::create)
                        .push(
                            Router::with_path("{id}")
                                .put(master_data::issuers::update)
                                .delete(master_data::issuers::delete),
                        ),
                )
                .push(Router::with_path("roles").get(master_data::roles::index))
                .push(
                    Router::with_path("users")
                        .get(users::index::handler)
                        .post(users::create::handler),
                )
                .push(
                    Router::with_path("batches")
                        .post(coupons::batches::create)
                        .push(
                            Router::with_path("{batch}")
                                .get(coupons::batches::show)
                                .push(Router::with_path("cards").get(coupons::batches::cards)),
                        ),
                )
                .push(
                    Router::with_path("coupons")
                        .push(Router::with_path("scan").post(coupons::coupons::scan))
                        .push(
                            Router::with_path("{coupon}")
                                .get(coupons::coupons::show)
                                .push(Router::with_path("card").get(coupons::coupons::card))
                                .push(
                                    Router::with_path("redemption")
                                        .post(coupons::coupons::redeem),
                                ),
                        ),
                )
                .push(Router::with_path("reports/coupons").get(reports::coupons::handler)),
        )
}
