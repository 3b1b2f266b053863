//! Auth Router

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
};

use crate::application::config::AuthConfig;
use crate::application::observer::SharedObserver;
use crate::domain::repository::AuthRepository;
use crate::infra::sqlite::SqliteAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{access_control, require_session};

/// Create the Auth router with the SQLite repository
pub fn auth_router(
    repo: SqliteAuthRepository,
    config: AuthConfig,
    observer: SharedObserver,
) -> Router {
    auth_router_generic(repo, config, observer)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig, observer: SharedObserver) -> Router
where
    R: AuthRepository,
{
    let state = AuthAppState::new(repo, config, observer);

    let protected = Router::new()
        .route("/users/{id}", patch(handlers::update_profile::<R>))
        .route("/oauth2/token/recreate", post(handlers::recreate::<R>))
        .route("/oauth2/clients", get(handlers::list_clients::<R>))
        .route_layer(from_fn_with_state(state.clone(), require_session::<R>));

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/auth/check", get(handlers::auth_check::<R>))
        .route(
            "/users/login",
            get(handlers::check_login::<R>).post(handlers::login::<R>),
        )
        .route("/users/logout", delete(handlers::logout::<R>))
        .route("/users/create", post(handlers::sign_up::<R>))
        .route(
            "/oauth2/token",
            get(handlers::token::<R>).post(handlers::token::<R>),
        )
        .route("/oauth2/authorize", get(handlers::authorize::<R>))
        .merge(protected)
        .layer(from_fn(access_control))
        .with_state(state)
}
