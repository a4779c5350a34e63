use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::prelude::User;
use super::entities::user;

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, sea_orm::DbErr> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<user::Model>, sea_orm::DbErr> {
    User::find_by_id(*id).one(db).await
}

pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
    is_staff: bool,
    is_admin: bool,
) -> Result<user::Model, sea_orm::DbErr> {
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        phone_number: Set(String::new()),
        profile_picture: Set(None),
        is_active: Set(true),
        is_staff: Set(is_staff),
        is_admin: Set(is_admin),
        last_login_at: Set(None),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn set_last_login(
    db: &DatabaseConnection,
    id: &Uuid,
    at: &chrono::DateTime<chrono::FixedOffset>,
) -> Result<(), sea_orm::DbErr> {
    user::ActiveModel {
        id: Set(*id),
        last_login_at: Set(Some(*at)),
        ..Default::default()
    }
    .update(db)
    .await?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.profile_picture.is_none()
    }
}

pub async fn update_profile(
    db: &DatabaseConnection,
    current: user::Model,
    changes: ProfileChanges,
) -> Result<user::Model, sea_orm::DbErr> {
    let mut active: user::ActiveModel = current.into();
    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = changes.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(profile_picture) = changes.profile_picture {
        active.profile_picture = Set(Some(profile_picture));
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await
}

/// Staff roster, ascending by email for deterministic output.
pub async fn list_staff(db: &DatabaseConnection) -> Result<Vec<user::Model>, sea_orm::DbErr> {
    User::find()
        .filter(user::Column::IsStaff.eq(true))
        .order_by_asc(user::Column::Email)
        .all(db)
        .await
}

pub async fn find_staff_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<user::Model>, sea_orm::DbErr> {
    User::find()
        .filter(user::Column::Id.eq(*id))
        .filter(user::Column::IsStaff.eq(true))
        .one(db)
        .await
}
