use chrono::Utc;
use chrono_tz::Tz;
use sea_orm::{DatabaseConnection, IsolationLevel, TransactionTrait};
use uuid::Uuid;

use crate::{
    auth::{Claims, Visibility},
    db::attendance_repo::{self, NewAttendance},
    db::entities::attendance_record,
    error::ApiError,
};

/// One check-in per staff member per local calendar day. The existence
/// check and the insert share a serializable transaction so two racing
/// submissions cannot both commit.
pub async fn submit(
    db: &DatabaseConnection,
    tz: Tz,
    claims: &Claims,
    data: NewAttendance,
) -> Result<attendance_record::Model, ApiError> {
    if !claims.is_staff() {
        return Err(ApiError::forbidden("Only staff may submit attendance"));
    }
    let staff_id = claims.user_id()?;

    let now = Utc::now().with_timezone(&tz);
    let today = now.date_naive();

    let txn = db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?;

    if attendance_repo::find_on_date(&txn, &staff_id, &today)
        .await?
        .is_some()
    {
        txn.rollback().await?;
        return Err(ApiError::validation("Already checked in today"));
    }

    let record = attendance_repo::create(&txn, &staff_id, now.fixed_offset(), today, data).await?;
    txn.commit().await?;
    Ok(record)
}

pub async fn list(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<Vec<attendance_record::Model>, ApiError> {
    match claims.visibility()? {
        Visibility::All => attendance_repo::list_all(db).await.map_err(Into::into),
        Visibility::Own(staff_id) => attendance_repo::list_by_staff(db, &staff_id)
            .await
            .map_err(Into::into),
        Visibility::Nothing => Ok(Vec::new()),
    }
}

pub async fn get(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
) -> Result<attendance_record::Model, ApiError> {
    find_visible(db, claims, id).await
}

pub async fn update_notes(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
    location_note: Option<String>,
    note: Option<String>,
) -> Result<attendance_record::Model, ApiError> {
    if location_note.is_none() && note.is_none() {
        return Err(ApiError::validation("Location note or note required"));
    }
    let record = find_visible(db, claims, id).await?;
    attendance_repo::update_notes(db, record, location_note, note)
        .await
        .map_err(Into::into)
}

pub async fn remove(db: &DatabaseConnection, claims: &Claims, id: &Uuid) -> Result<(), ApiError> {
    let record = find_visible(db, claims, id).await?;
    attendance_repo::delete(db, &record.id).await?;
    Ok(())
}

/// Out-of-scope records read as not-found, never as forbidden.
async fn find_visible(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
) -> Result<attendance_record::Model, ApiError> {
    let found = match claims.visibility()? {
        Visibility::All => attendance_repo::find_by_id(db, id).await?,
        Visibility::Own(staff_id) => attendance_repo::find_owned(db, id, &staff_id).await?,
        Visibility::Nothing => None,
    };
    found.ok_or_else(|| ApiError::not_found("Attendance record not found"))
}
