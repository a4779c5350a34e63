use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Role, jwt::jwt_auth, role_layer::RequireRoleLayer},
    db::entities::{attendance_record, incident_report, user},
    db::{attendance_repo, incident_repo, user_repo},
    error::ApiError,
    routes::incident::IncidentResponse,
    services::{incident_service, summary_service},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct StaffDetailResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub joined_at: DateTimeWithTimeZone,
}

impl From<user::Model> for StaffDetailResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone_number: model.phone_number,
            profile_picture: model.profile_picture,
            is_active: model.is_active,
            last_login_at: model.last_login_at,
            joined_at: model.created_at,
        }
    }
}

/// Attendance record decorated with its author, for the monitoring views.
#[derive(Debug, Serialize)]
pub struct AdminAttendanceResponse {
    pub id: Uuid,
    pub staff_name: String,
    pub staff_email: String,
    pub timestamp: DateTimeWithTimeZone,
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub selfie_photo: String,
}

impl From<(attendance_record::Model, Option<user::Model>)> for AdminAttendanceResponse {
    fn from((record, staff): (attendance_record::Model, Option<user::Model>)) -> Self {
        let (staff_name, staff_email) = staff
            .map(|s| (s.first_name, s.email))
            .unwrap_or_default();
        Self {
            id: record.id,
            staff_name,
            staff_email,
            timestamp: record.timestamp,
            latitude: record.latitude,
            longitude: record.longitude,
            location_note: record.location_note,
            note: record.note,
            selfie_photo: record.selfie_photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminIncidentResponse {
    pub id: Uuid,
    pub staff_name: String,
    pub staff_email: String,
    pub timestamp: DateTimeWithTimeZone,
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub photo: String,
    pub status: String,
    pub priority: String,
}

impl From<(incident_report::Model, Option<user::Model>)> for AdminIncidentResponse {
    fn from((report, staff): (incident_report::Model, Option<user::Model>)) -> Self {
        let (staff_name, staff_email) = staff
            .map(|s| (s.first_name, s.email))
            .unwrap_or_default();
        Self {
            id: report.id,
            staff_name,
            staff_email,
            timestamp: report.timestamp,
            latitude: report.latitude,
            longitude: report.longitude,
            location_note: report.location_note,
            note: report.note,
            photo: report.photo,
            status: report.status,
            priority: report.priority,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewIncidentRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryParams {
    pub date: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/staff", get(list_staff))
        .route("/admin/staff/{id}", get(get_staff))
        .route("/admin/attendance", get(list_attendance))
        .route("/admin/attendance/daily", get(daily_summary))
        .route("/admin/attendance/{id}", get(get_attendance))
        .route("/admin/incidents", get(list_incidents).post(create_incident))
        .route(
            "/admin/incidents/{id}",
            get(get_incident).patch(review_incident).delete(delete_incident),
        )
        .layer(RequireRoleLayer::new(Role::Admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn list_staff(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StaffDetailResponse>>, ApiError> {
    let staff = user_repo::list_staff(&state.db).await?;
    Ok(Json(
        staff.into_iter().map(StaffDetailResponse::from).collect(),
    ))
}

async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffDetailResponse>, ApiError> {
    let staff = user_repo::find_staff_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;
    Ok(Json(staff.into()))
}

async fn list_attendance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminAttendanceResponse>>, ApiError> {
    let records = attendance_repo::list_all_with_staff(&state.db).await?;
    Ok(Json(
        records
            .into_iter()
            .map(AdminAttendanceResponse::from)
            .collect(),
    ))
}

async fn get_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminAttendanceResponse>, ApiError> {
    let record = attendance_repo::find_with_staff(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Attendance record not found"))?;
    Ok(Json(record.into()))
}

async fn daily_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailySummaryParams>,
) -> Result<Json<summary_service::DailySummary>, ApiError> {
    let summary =
        summary_service::generate(&state.db, state.cfg.timezone, params.date.as_deref()).await?;
    Ok(Json(summary))
}

async fn list_incidents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminIncidentResponse>>, ApiError> {
    let reports = incident_repo::list_all_with_staff(&state.db).await?;
    Ok(Json(
        reports
            .into_iter()
            .map(AdminIncidentResponse::from)
            .collect(),
    ))
}

async fn get_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminIncidentResponse>, ApiError> {
    let report = incident_repo::find_with_staff(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Incident report not found"))?;
    Ok(Json(report.into()))
}

/// Reports are authored by staff only; the admin surface never creates one.
async fn create_incident() -> ApiError {
    ApiError::forbidden("Incident reports can only be created by staff")
}

async fn review_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewIncidentRequest>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let report = incident_service::review(&state.db, &id, body.status, body.priority).await?;
    Ok(Json(report.into()))
}

async fn delete_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = incident_repo::delete(&state.db, &id).await?;
    if !deleted {
        return Err(ApiError::not_found("Incident report not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
