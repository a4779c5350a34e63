use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::entities::prelude::IncidentReport;
use super::entities::{incident_report, user};

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub photo: String,
}

pub async fn create(
    db: &DatabaseConnection,
    staff_id: &Uuid,
    timestamp: DateTimeWithTimeZone,
    status: &str,
    priority: &str,
    data: NewIncident,
) -> Result<incident_report::Model, sea_orm::DbErr> {
    let model = incident_report::ActiveModel {
        id: Set(Uuid::new_v4()),
        staff_id: Set(*staff_id),
        timestamp: Set(timestamp),
        latitude: Set(data.latitude),
        longitude: Set(data.longitude),
        location_note: Set(data.location_note),
        note: Set(data.note),
        photo: Set(data.photo),
        status: Set(status.to_string()),
        priority: Set(priority.to_string()),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn list_all(
    db: &DatabaseConnection,
) -> Result<Vec<incident_report::Model>, sea_orm::DbErr> {
    IncidentReport::find()
        .order_by_desc(incident_report::Column::Timestamp)
        .all(db)
        .await
}

pub async fn list_by_staff(
    db: &DatabaseConnection,
    staff_id: &Uuid,
) -> Result<Vec<incident_report::Model>, sea_orm::DbErr> {
    IncidentReport::find()
        .filter(incident_report::Column::StaffId.eq(*staff_id))
        .order_by_desc(incident_report::Column::Timestamp)
        .all(db)
        .await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<incident_report::Model>, sea_orm::DbErr> {
    IncidentReport::find_by_id(*id).one(db).await
}

pub async fn find_owned(
    db: &DatabaseConnection,
    id: &Uuid,
    staff_id: &Uuid,
) -> Result<Option<incident_report::Model>, sea_orm::DbErr> {
    IncidentReport::find()
        .filter(incident_report::Column::Id.eq(*id))
        .filter(incident_report::Column::StaffId.eq(*staff_id))
        .one(db)
        .await
}

pub async fn update_notes(
    db: &DatabaseConnection,
    report: incident_report::Model,
    location_note: Option<String>,
    note: Option<String>,
) -> Result<incident_report::Model, sea_orm::DbErr> {
    let mut active: incident_report::ActiveModel = report.into();
    if let Some(location_note) = location_note {
        active.location_note = Set(Some(location_note));
    }
    if let Some(note) = note {
        active.note = Set(Some(note));
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await
}

/// Status/priority are the only columns the admin review path may touch.
pub async fn set_status_priority(
    db: &DatabaseConnection,
    report: incident_report::Model,
    status: Option<String>,
    priority: Option<String>,
) -> Result<incident_report::Model, sea_orm::DbErr> {
    let mut active: incident_report::ActiveModel = report.into();
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(priority) = priority {
        active.priority = Set(priority);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await
}

pub async fn delete(db: &DatabaseConnection, id: &Uuid) -> Result<bool, sea_orm::DbErr> {
    let result = IncidentReport::delete_by_id(*id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn list_all_with_staff(
    db: &DatabaseConnection,
) -> Result<Vec<(incident_report::Model, Option<user::Model>)>, sea_orm::DbErr> {
    IncidentReport::find()
        .find_also_related(user::Entity)
        .order_by_desc(incident_report::Column::Timestamp)
        .all(db)
        .await
}

pub async fn find_with_staff(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<(incident_report::Model, Option<user::Model>)>, sea_orm::DbErr> {
    IncidentReport::find()
        .filter(incident_report::Column::Id.eq(*id))
        .find_also_related(user::Entity)
        .one(db)
        .await
}
