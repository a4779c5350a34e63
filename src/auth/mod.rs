pub mod jwt;
pub mod password;
pub mod role_layer;

use axum::{extract::FromRequestParts, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// Capability set carried in the access token, derived from the user's
/// stored role flags at issue time.
pub fn roles_from_flags(is_staff: bool, is_admin: bool) -> Vec<Role> {
    let mut roles = Vec::new();
    if is_staff {
        roles.push(Role::Staff);
    }
    if is_admin {
        roles.push(Role::Admin);
    }
    roles
}

/// What a caller may see of the attendance and incident stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every record system-wide.
    All,
    /// Only records authored by this user.
    Own(Uuid),
    /// No records at all.
    Nothing,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
    pub roles: Vec<Role>,
}

impl Claims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| *r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(Role::Staff)
    }

    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::unauthorized("Token subject is not a user id"))
    }

    /// Admin scope wins when a caller holds both roles.
    pub fn visibility(&self) -> Result<Visibility, ApiError> {
        if self.is_admin() {
            return Ok(Visibility::All);
        }
        if self.is_staff() {
            return Ok(Visibility::Own(self.user_id()?));
        }
        Ok(Visibility::Nothing)
    }
}

// Helper extractor: pull JWT claims from request extensions.
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "No claims in request"))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{Claims, Role, Visibility, roles_from_flags};

    fn claims_with(roles: Vec<Role>) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            iat: 0,
            roles,
        }
    }

    #[test]
    fn role_string_roundtrip() {
        assert_eq!(Role::Staff.as_str(), "staff");
        assert_eq!(Role::Admin.as_str(), "admin");

        assert_eq!(Role::try_from("staff"), Ok(Role::Staff));
        assert_eq!(Role::try_from("admin"), Ok(Role::Admin));
        assert!(Role::try_from("supervisor").is_err());
    }

    #[test]
    fn flags_map_to_capability_set() {
        assert_eq!(roles_from_flags(true, false), vec![Role::Staff]);
        assert_eq!(roles_from_flags(false, true), vec![Role::Admin]);
        assert_eq!(roles_from_flags(true, true), vec![Role::Staff, Role::Admin]);
        assert!(roles_from_flags(false, false).is_empty());
    }

    #[test]
    fn admin_visibility_wins_over_staff() {
        let both = claims_with(vec![Role::Staff, Role::Admin]);
        assert_eq!(both.visibility().unwrap(), Visibility::All);
    }

    #[test]
    fn staff_see_only_their_own_records() {
        let staff = claims_with(vec![Role::Staff]);
        let id = staff.user_id().unwrap();
        assert_eq!(staff.visibility().unwrap(), Visibility::Own(id));
    }

    #[test]
    fn no_role_sees_nothing() {
        let none = claims_with(vec![]);
        assert_eq!(none.visibility().unwrap(), Visibility::Nothing);
    }
}
