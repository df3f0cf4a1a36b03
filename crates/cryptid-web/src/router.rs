//! Axum router construction for the Cryptid API.
//!
//! Each collection answers both with and without a trailing slash.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::users;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET|POST /creature` -- list, create
/// - `GET|PATCH|DELETE /creature/{name}` -- read, replace, delete
/// - `GET|POST /explorer` -- list, create
/// - `PATCH /explorer/?name=` -- replace
/// - `GET|DELETE /explorer/{name}` -- read, delete
/// - `GET|POST /user` -- list, create
/// - `POST /user/login`, `POST /user/logout`, `GET /user/get/me`
/// - `GET|PATCH|DELETE /user/{name}` -- admin only
pub fn build_router(state: Arc<AppState>) -> Router {
    let creatures = get(handlers::list_creatures).post(handlers::create_creature);
    let explorers = get(handlers::list_explorers).post(handlers::create_explorer);
    let users = get(users::list_users).post(users::create_user);

    Router::new()
        // Creatures
        .route("/creature", creatures.clone())
        .route("/creature/", creatures)
        .route(
            "/creature/{name}",
            get(handlers::get_creature)
                .patch(handlers::modify_creature)
                .delete(handlers::delete_creature),
        )
        // Explorers
        .route("/explorer", explorers.clone())
        .route("/explorer/", explorers.patch(handlers::modify_explorer))
        .route(
            "/explorer/{name}",
            get(handlers::get_explorer).delete(handlers::delete_explorer),
        )
        // Users and sessions
        .route("/user", users.clone())
        .route("/user/", users)
        .route("/user/login", post(users::login))
        .route("/user/logout", post(users::logout))
        .route("/user/get/me", get(users::me))
        .route(
            "/user/{name}",
            get(users::get_user)
                .patch(users::modify_user)
                .delete(users::delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
