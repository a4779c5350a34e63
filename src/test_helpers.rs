use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        jwt::{encode_token, make_access_claims},
    },
    config::AppConfig,
    routes::router,
    state::AppState,
};

pub fn mock_state(secret: &[u8]) -> Arc<AppState> {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    state_with_db(secret, db)
}

pub fn state_with_db(secret: &[u8], db: DatabaseConnection) -> Arc<AppState> {
    let mut cfg = AppConfig::from_env().expect("load app config");
    cfg.jwt_secret = String::from_utf8_lossy(secret).into_owned();
    AppState::new(cfg, db)
}

pub fn test_router(secret: &[u8]) -> Router {
    router(mock_state(secret))
}

/// Mints an access token the way the login path would, for route tests.
pub fn access_token(state: &AppState, user_id: &Uuid, roles: Vec<Role>) -> String {
    let claims = make_access_claims(user_id, roles, 3600);
    encode_token(&state.jwt, &claims).expect("encode test token")
}
