use serde::Deserialize;
use tracing::warn;

/// Used when `JWT_SECRET` is unset. Anyone who knows it can mint tokens.
pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-key-change-in-production";

/// Seven days.
pub const DEFAULT_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET is not set; falling back to the built-in insecure secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };
        let jwt = JwtConfig {
            secret,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_TTL_MINUTES),
        };
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
        })
    }
}
