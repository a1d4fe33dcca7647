//! Runtime configuration, read from the environment (and `.env` when present).

use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "fallback-secret-key-for-development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Reverse geocoding endpoint (Nominatim compatible).
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/team.db".to_string(),
            bind_addr: "0.0.0.0:3001".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: 30 * 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            geocoder_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            geocoder_user_agent: "MapGame/1.0".to_string(),
            geocoder_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Ok(Self {
            database_url: try_load("DATABASE_URL", defaults.database_url)?,
            bind_addr: try_load("BIND_ADDR", defaults.bind_addr)?,
            jwt_secret,
            token_ttl_hours: try_load("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            bcrypt_cost: try_load("BCRYPT_COST", defaults.bcrypt_cost)?,
            geocoder_url: try_load("GEOCODER_URL", defaults.geocoder_url)?,
            geocoder_user_agent: try_load("GEOCODER_USER_AGENT", defaults.geocoder_user_agent)?,
            geocoder_timeout: Duration::from_secs(try_load(
                "GEOCODER_TIMEOUT_SECS",
                defaults.geocoder_timeout.as_secs(),
            )?),
        })
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
