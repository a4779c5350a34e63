use sea_orm::DatabaseConnection;

use crate::{
    auth::{
        jwt::{encode_token, make_access_claims},
        password::{hash_password, verify_password},
        roles_from_flags,
    },
    config::AppConfig,
    db::{entities::user, refresh_token_repo, user_repo},
    error::ApiError,
    state::JwtKeys,
};

const ACCESS_TTL_SECS: usize = 15 * 60; // 15 minutes
const REFRESH_TTL_DAYS: i64 = 30;

#[derive(Debug)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, jwt: JwtKeys) -> Self {
        Self { db, jwt }
    }

    /// Registration takes email and password only; everything else starts
    /// empty. New accounts are active field staff, never admins.
    pub async fn register(&self, email: &str, password: &str) -> Result<user::Model, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        if user_repo::find_by_email(&self.db, email).await?.is_some() {
            return Err(ApiError::conflict("Email already registered"));
        }

        let password_hash = hash_password(password)?;
        let user = user_repo::create_user(&self.db, email, &password_hash, true, false).await?;
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, ApiError> {
        let user = user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        if !user.is_active {
            return Err(ApiError::unauthorized("Account disabled"));
        }

        let now = chrono::Utc::now().fixed_offset();
        user_repo::set_last_login(&self.db, &user.id, &now).await?;

        self.issue_tokens(&user).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, ApiError> {
        let token = refresh_token_repo::find_active_by_token(&self.db, refresh_token)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

        if token.expires_at < chrono::Utc::now().fixed_offset() {
            return Err(ApiError::unauthorized("Refresh token expired"));
        }

        let user = user_repo::find_by_id(&self.db, &token.user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User missing"))?;

        // Rotate: the presented token is spent whether or not issuing succeeds.
        refresh_token_repo::revoke_token(&self.db, refresh_token).await?;

        self.issue_tokens(&user).await
    }

    pub async fn seed_admin(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        if let Some(existing) = user_repo::find_by_email(&self.db, &cfg.admin_email).await? {
            tracing::info!("admin user already present: {}", existing.email);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|e| anyhow::anyhow!("admin seed hash error: {}", e.message()))?;
        let user = user_repo::create_user(&self.db, &cfg.admin_email, &hash, false, true).await?;
        tracing::info!("seeded admin user {}", user.email);
        Ok(())
    }

    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, ApiError> {
        let roles = roles_from_flags(user.is_staff, user.is_admin);
        let claims = make_access_claims(&user.id, roles, ACCESS_TTL_SECS);
        let access_token = encode_token(&self.jwt, &claims)?;

        let refresh =
            refresh_token_repo::create_refresh_token(&self.db, &user.id, Some(REFRESH_TTL_DAYS))
                .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: ACCESS_TTL_SECS,
        })
    }
}
