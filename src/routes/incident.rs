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
    db::entities::incident_report,
    db::incident_repo::NewIncident,
    error::ApiError,
    services::incident_service,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateIncidentRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub photo: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIncidentRequest {
    pub location_note: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IncidentResponse {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub timestamp: DateTimeWithTimeZone,
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub photo: String,
    pub status: String,
    pub priority: String,
}

impl From<incident_report::Model> for IncidentResponse {
    fn from(model: incident_report::Model) -> Self {
        Self {
            id: model.id,
            staff_id: model.staff_id,
            timestamp: model.timestamp,
            latitude: model.latitude,
            longitude: model.longitude,
            location_note: model.location_note,
            note: model.note,
            photo: model.photo,
            status: model.status,
            priority: model.priority,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/incidents", post(create).get(list))
        .route(
            "/incidents/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn create(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Json(body): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    let data = NewIncident {
        latitude: body.latitude,
        longitude: body.longitude,
        location_note: body.location_note,
        note: body.note,
        photo: body.photo,
    };
    let report = incident_service::submit(&state.db, &claims, data).await?;
    Ok((StatusCode::CREATED, Json(report.into())))
}

async fn list(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<Vec<IncidentResponse>>, ApiError> {
    let reports = incident_service::list(&state.db, &claims).await?;
    Ok(Json(
        reports.into_iter().map(IncidentResponse::from).collect(),
    ))
}

async fn get_one(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let report = incident_service::get(&state.db, &claims, &id).await?;
    Ok(Json(report.into()))
}

async fn update(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIncidentRequest>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let report = incident_service::update_notes(
        &state.db,
        &claims,
        &id,
        body.location_note,
        body.note,
    )
    .await?;
    Ok(Json(report.into()))
}

async fn delete_one(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    incident_service::remove(&state.db, &claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
