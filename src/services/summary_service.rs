use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::{DatabaseConnection, prelude::DateTimeWithTimeZone};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::attendance_repo,
    db::entities::attendance_record,
    db::user_repo,
    error::ApiError,
};

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceDetail {
    pub id: Uuid,
    pub timestamp: DateTimeWithTimeZone,
    pub latitude: f64,
    pub longitude: f64,
    pub location_note: Option<String>,
    pub note: Option<String>,
    pub selfie_photo: String,
}

impl From<attendance_record::Model> for AttendanceDetail {
    fn from(model: attendance_record::Model) -> Self {
        Self {
            id: model.id,
            timestamp: model.timestamp,
            latitude: model.latitude,
            longitude: model.longitude,
            location_note: model.location_note,
            note: model.note,
            selfie_photo: model.selfie_photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StaffDayStatus {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub present: bool,
    pub last_attendance: Option<AttendanceDetail>,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub report_date: String,
    pub total_staff: usize,
    pub present: usize,
    pub absent: usize,
    pub staff: Vec<StaffDayStatus>,
}

/// Omitted date means "today" in the configured zone; a supplied one must
/// be ISO `YYYY-MM-DD`.
pub fn resolve_target_date(tz: Tz, raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw {
        None => Ok(Utc::now().with_timezone(&tz).date_naive()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| ApiError::format("Invalid date, expected YYYY-MM-DD")),
    }
}

pub fn full_name(first_name: &str, last_name: &str, email: &str) -> String {
    let full = format!("{first_name} {last_name}").trim().to_string();
    if full.is_empty() { email.to_string() } else { full }
}

/// Cross-references the staff roster against one batched per-date query:
/// roster ascending by email, newest record per staff member wins.
pub async fn generate(
    db: &DatabaseConnection,
    tz: Tz,
    raw_date: Option<&str>,
) -> Result<DailySummary, ApiError> {
    let date = resolve_target_date(tz, raw_date)?;

    let roster = user_repo::list_staff(db).await?;

    // list_on_date returns newest first, so the first record seen per
    // staff member is their latest check-in on that day.
    let mut latest: HashMap<Uuid, attendance_record::Model> = HashMap::new();
    for record in attendance_repo::list_on_date(db, &date).await? {
        latest.entry(record.staff_id).or_insert(record);
    }

    let staff: Vec<StaffDayStatus> = roster
        .into_iter()
        .map(|user| {
            let derived = full_name(&user.first_name, &user.last_name, &user.email);
            let last = latest.remove(&user.id);
            StaffDayStatus {
                id: user.id,
                first_name: user.first_name,
                last_name: user.last_name,
                full_name: derived,
                email: user.email,
                phone_number: user.phone_number,
                present: last.is_some(),
                last_attendance: last.map(Into::into),
            }
        })
        .collect();

    let total_staff = staff.len();
    let present = staff.iter().filter(|s| s.present).count();

    Ok(DailySummary {
        report_date: date.format("%Y-%m-%d").to_string(),
        total_staff,
        present,
        absent: total_staff - present,
        staff,
    })
}
