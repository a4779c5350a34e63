use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod incident;
pub mod profile;
pub mod public;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(profile::router(state.clone()))
        .merge(attendance::router(state.clone()))
        .merge(incident::router(state.clone()))
        .merge(admin::router(state))
}
