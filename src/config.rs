use anyhow::{Context, Result};
use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_idle: u32,
    pub jwt_secret: String,
    pub log_level: String,
    pub admin_email: String,
    pub admin_password: String,
    /// IANA zone used for every "local calendar date" computation.
    pub timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env if present
        let _ = dotenvy::dotenv();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid u16")?;
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/fieldtrack".to_string());
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?;
        let db_min_idle = std::env::var("DB_MIN_IDLE")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("DB_MIN_IDLE must be a valid u32")?;
        let log_level =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".to_string());

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(val) => val,
            Err(_) if cfg!(debug_assertions) => "super-secret-change-me".to_string(),
            Err(err) => {
                Err(anyhow::anyhow!(err)).context("JWT_SECRET is required in release builds")?
            }
        };

        let admin_email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(val) => val,
            Err(_) if cfg!(debug_assertions) => "change-me-admin".to_string(),
            Err(err) => {
                Err(anyhow::anyhow!(err)).context("ADMIN_PASSWORD is required in release builds")?
            }
        };

        let timezone = std::env::var("APP_TIMEZONE")
            .unwrap_or_else(|_| "UTC".to_string())
            .parse::<Tz>()
            .map_err(|err| anyhow::anyhow!("APP_TIMEZONE must be an IANA zone name: {err}"))?;

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            db_min_idle,
            jwt_secret,
            log_level,
            admin_email,
            admin_password,
            timezone,
        })
    }
}
