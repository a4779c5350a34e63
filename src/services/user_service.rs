use sea_orm::DatabaseConnection;

use crate::{
    auth::Claims,
    db::entities::user,
    db::user_repo::{self, ProfileChanges},
    error::ApiError,
};

pub async fn get_profile(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<user::Model, ApiError> {
    let id = claims.user_id()?;
    user_repo::find_by_id(db, &id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))
}

/// Names, phone number and picture reference only. Email, role flags,
/// activity and last-login are not editable through the profile.
pub async fn update_profile(
    db: &DatabaseConnection,
    claims: &Claims,
    changes: ProfileChanges,
) -> Result<user::Model, ApiError> {
    if changes.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }
    let current = get_profile(db, claims).await?;
    user_repo::update_profile(db, current, changes)
        .await
        .map_err(Into::into)
}
