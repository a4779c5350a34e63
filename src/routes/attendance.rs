use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Claims, jwt::jwt_auth},
    db::attendance_repo::NewAttendance,
    db::entities::attendance_record,
    error::ApiError,
    services::attendance_service,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateAttendanceRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub selfie_photo: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub location_note: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub timestamp: DateTimeWithTimeZone,
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub selfie_photo: String,
}

impl From<attendance_record::Model> for AttendanceResponse {
    fn from(model: attendance_record::Model) -> Self {
        Self {
            id: model.id,
            staff_id: model.staff_id,
            timestamp: model.timestamp,
            latitude: model.latitude,
            longitude: model.longitude,
            location_note: model.location_note,
            note: model.note,
            selfie_photo: model.selfie_photo,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/attendance", post(create).get(list))
        .route(
            "/attendance/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn create(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Json(body): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiError> {
    let data = NewAttendance {
        latitude: body.latitude,
        longitude: body.longitude,
        location_note: body.location_note,
        note: body.note,
        selfie_photo: body.selfie_photo,
    };
    let record =
        attendance_service::submit(&state.db, state.cfg.timezone, &claims, data).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn list(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = attendance_service::list(&state.db, &claims).await?;
    Ok(Json(
        records.into_iter().map(AttendanceResponse::from).collect(),
    ))
}

async fn get_one(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let record = attendance_service::get(&state.db, &claims, &id).await?;
    Ok(Json(record.into()))
}

async fn update(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let record = attendance_service::update_notes(
        &state.db,
        &claims,
        &id,
        body.location_note,
        body.note,
    )
    .await?;
    Ok(Json(record.into()))
}

async fn delete_one(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    attendance_service::remove(&state.db, &claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
