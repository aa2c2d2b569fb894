use chrono_tz::Tz;
use std::env;
use std::fmt;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_GEOCODER_FALLBACK: &str = "Unknown location";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, reason) => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub timezone: Tz,
    pub geocoder_url: Url,
    pub geocoder_fallback: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment. Call `dotenv()` first
    /// to merge a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET", "cannot be empty".to_string()));
        }

        let timezone = match lookup("APP_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|err| ConfigError::Invalid("APP_TIMEZONE", err.to_string()))?,
            None => Tz::UTC,
        };

        let geocoder_url = lookup("GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());
        let geocoder_url = Url::parse(&geocoder_url)
            .map_err(|err| ConfigError::Invalid("GEOCODER_URL", err.to_string()))?;

        Ok(AppConfig {
            database_url,
            jwt_secret,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            timezone,
            geocoder_url,
            geocoder_fallback: lookup("GEOCODER_FALLBACK")
                .unwrap_or_else(|| DEFAULT_GEOCODER_FALLBACK.to_string()),
        })
    }
}
