use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Claims, jwt::jwt_auth},
    db::entities::user,
    db::user_repo::ProfileChanges,
    error::ApiError,
    services::user_service,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_staff: bool,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub joined_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            profile_picture: model.profile_picture,
            is_active: model.is_active,
            is_admin: model.is_admin,
            is_staff: model.is_staff,
            last_login_at: model.last_login_at,
            joined_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn me(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<UserResponse>, ApiError> {
    let user = user_service::get_profile(&state.db, &claims).await?;
    Ok(Json(user.into()))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = ProfileChanges {
        first_name: body.first_name,
        last_name: body.last_name,
        phone_number: body.phone_number,
        profile_picture: body.profile_picture,
    };
    let user = user_service::update_profile(&state.db, &claims, changes).await?;
    Ok(Json(user.into()))
}
