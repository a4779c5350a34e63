use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::entities::prelude::AttendanceRecord;
use super::entities::{attendance_record, user};

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub selfie_photo: String,
}

/// Generic over the connection so the caller can run the daily-uniqueness
/// check and this insert inside one transaction.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    staff_id: &Uuid,
    timestamp: DateTimeWithTimeZone,
    local_date: NaiveDate,
    data: NewAttendance,
) -> Result<attendance_record::Model, sea_orm::DbErr> {
    let model = attendance_record::ActiveModel {
        id: Set(Uuid::new_v4()),
        staff_id: Set(*staff_id),
        timestamp: Set(timestamp),
        local_date: Set(local_date),
        latitude: Set(data.latitude),
        longitude: Set(data.longitude),
        location_note: Set(data.location_note),
        note: Set(data.note),
        selfie_photo: Set(data.selfie_photo),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    };
    model.insert(conn).await
}

pub async fn find_on_date<C: ConnectionTrait>(
    conn: &C,
    staff_id: &Uuid,
    date: &NaiveDate,
) -> Result<Option<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::StaffId.eq(*staff_id))
        .filter(attendance_record::Column::LocalDate.eq(*date))
        .one(conn)
        .await
}

pub async fn list_all(
    db: &DatabaseConnection,
) -> Result<Vec<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .order_by_desc(attendance_record::Column::Timestamp)
        .all(db)
        .await
}

pub async fn list_by_staff(
    db: &DatabaseConnection,
    staff_id: &Uuid,
) -> Result<Vec<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::StaffId.eq(*staff_id))
        .order_by_desc(attendance_record::Column::Timestamp)
        .all(db)
        .await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find_by_id(*id).one(db).await
}

pub async fn find_owned(
    db: &DatabaseConnection,
    id: &Uuid,
    staff_id: &Uuid,
) -> Result<Option<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::Id.eq(*id))
        .filter(attendance_record::Column::StaffId.eq(*staff_id))
        .one(db)
        .await
}

pub async fn update_notes(
    db: &DatabaseConnection,
    record: attendance_record::Model,
    location_note: Option<String>,
    note: Option<String>,
) -> Result<attendance_record::Model, sea_orm::DbErr> {
    let mut active: attendance_record::ActiveModel = record.into();
    if let Some(location_note) = location_note {
        active.location_note = Set(Some(location_note));
    }
    if let Some(note) = note {
        active.note = Set(Some(note));
    }
    active.updated_at = Set(chrono::Utc::now().fixed_offset());
    active.update(db).await
}

pub async fn delete(db: &DatabaseConnection, id: &Uuid) -> Result<bool, sea_orm::DbErr> {
    let result = AttendanceRecord::delete_by_id(*id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// All check-ins for one calendar day, newest first. The daily summary
/// consumes this as its single batched query.
pub async fn list_on_date(
    db: &DatabaseConnection,
    date: &NaiveDate,
) -> Result<Vec<attendance_record::Model>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::LocalDate.eq(*date))
        .order_by_desc(attendance_record::Column::Timestamp)
        .all(db)
        .await
}

pub async fn list_all_with_staff(
    db: &DatabaseConnection,
) -> Result<Vec<(attendance_record::Model, Option<user::Model>)>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .find_also_related(user::Entity)
        .order_by_desc(attendance_record::Column::Timestamp)
        .all(db)
        .await
}

pub async fn find_with_staff(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<(attendance_record::Model, Option<user::Model>)>, sea_orm::DbErr> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::Id.eq(*id))
        .find_also_related(user::Entity)
        .one(db)
        .await
}
