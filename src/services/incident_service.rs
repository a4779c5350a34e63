use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    auth::{Claims, Visibility},
    db::entities::incident_report,
    db::incident_repo::{self, NewIncident},
    error::ApiError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::InProgress => "in_progress",
            IncidentStatus::Resolved => "resolved",
        }
    }
}

impl TryFrom<&str> for IncidentStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(IncidentStatus::Open),
            "in_progress" => Ok(IncidentStatus::InProgress),
            "resolved" => Ok(IncidentStatus::Resolved),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentPriority {
    Low,
    Normal,
    High,
}

impl IncidentPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentPriority::Low => "low",
            IncidentPriority::Normal => "normal",
            IncidentPriority::High => "high",
        }
    }
}

impl TryFrom<&str> for IncidentPriority {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(IncidentPriority::Low),
            "normal" => Ok(IncidentPriority::Normal),
            "high" => Ok(IncidentPriority::High),
            _ => Err(()),
        }
    }
}

/// New reports always open at normal priority; the author cannot set either.
pub async fn submit(
    db: &DatabaseConnection,
    claims: &Claims,
    data: NewIncident,
) -> Result<incident_report::Model, ApiError> {
    if !claims.is_staff() {
        return Err(ApiError::forbidden("Only staff may file incident reports"));
    }
    let staff_id = claims.user_id()?;
    let now = Utc::now().fixed_offset();

    incident_repo::create(
        db,
        &staff_id,
        now,
        IncidentStatus::Open.as_str(),
        IncidentPriority::Normal.as_str(),
        data,
    )
    .await
    .map_err(Into::into)
}

pub async fn list(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<Vec<incident_report::Model>, ApiError> {
    match claims.visibility()? {
        Visibility::All => incident_repo::list_all(db).await.map_err(Into::into),
        Visibility::Own(staff_id) => incident_repo::list_by_staff(db, &staff_id)
            .await
            .map_err(Into::into),
        Visibility::Nothing => Ok(Vec::new()),
    }
}

pub async fn get(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
) -> Result<incident_report::Model, ApiError> {
    find_visible(db, claims, id).await
}

pub async fn update_notes(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
    location_note: Option<String>,
    note: Option<String>,
) -> Result<incident_report::Model, ApiError> {
    if location_note.is_none() && note.is_none() {
        return Err(ApiError::validation("Location note or note required"));
    }
    let report = find_visible(db, claims, id).await?;
    incident_repo::update_notes(db, report, location_note, note)
        .await
        .map_err(Into::into)
}

pub async fn remove(db: &DatabaseConnection, claims: &Claims, id: &Uuid) -> Result<(), ApiError> {
    let report = find_visible(db, claims, id).await?;
    incident_repo::delete(db, &report.id).await?;
    Ok(())
}

/// Admin review: status/priority only, everything else stays as authored.
pub async fn review(
    db: &DatabaseConnection,
    id: &Uuid,
    status: Option<String>,
    priority: Option<String>,
) -> Result<incident_report::Model, ApiError> {
    if status.is_none() && priority.is_none() {
        return Err(ApiError::validation("Status or priority required"));
    }

    let status = match status {
        Some(raw) => Some(
            IncidentStatus::try_from(raw.as_str())
                .map_err(|_| ApiError::validation("Unknown status"))?,
        ),
        None => None,
    };
    let priority = match priority {
        Some(raw) => Some(
            IncidentPriority::try_from(raw.as_str())
                .map_err(|_| ApiError::validation("Unknown priority"))?,
        ),
        None => None,
    };

    let report = incident_repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Incident report not found"))?;

    incident_repo::set_status_priority(
        db,
        report,
        status.map(|s| s.as_str().to_string()),
        priority.map(|p| p.as_str().to_string()),
    )
    .await
    .map_err(Into::into)
}

async fn find_visible(
    db: &DatabaseConnection,
    claims: &Claims,
    id: &Uuid,
) -> Result<incident_report::Model, ApiError> {
    let found = match claims.visibility()? {
        Visibility::All => incident_repo::find_by_id(db, id).await?,
        Visibility::Own(staff_id) => incident_repo::find_owned(db, id, &staff_id).await?,
        Visibility::Nothing => None,
    };
    found.ok_or_else(|| ApiError::not_found("Incident report not found"))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{IncidentPriority, IncidentStatus, review, submit};
    use crate::{
        auth::{Claims, Role},
        db::incident_repo::NewIncident,
        error::ApiError,
    };

    #[test]
    fn status_string_roundtrip() {
        for status in [
            IncidentStatus::Open,
            IncidentStatus::InProgress,
            IncidentStatus::Resolved,
        ] {
            assert_eq!(IncidentStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(IncidentStatus::try_from("closed").is_err());
    }

    #[test]
    fn priority_string_roundtrip() {
        for priority in [
            IncidentPriority::Low,
            IncidentPriority::Normal,
            IncidentPriority::High,
        ] {
            assert_eq!(IncidentPriority::try_from(priority.as_str()), Ok(priority));
        }
        assert!(IncidentPriority::try_from("urgent").is_err());
    }

    #[tokio::test]
    async fn non_staff_submission_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            iat: 0,
            roles: vec![Role::Admin],
        };
        let data = NewIncident {
            latitude: 1.0,
            longitude: 2.0,
            location_note: None,
            note: None,
            photo: "photos/x.jpg".to_string(),
        };

        let err = submit(&db, &claims, data).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn review_rejects_unknown_status_before_touching_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = review(&db, &Uuid::new_v4(), Some("closed".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn review_requires_some_change() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = review(&db, &Uuid::new_v4(), None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
