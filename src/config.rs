use crate::error::AppError;
use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

const DEFAULT_REGION: &str = "euw1";
const DEFAULT_LOCALE: &str = "en_US";
const DEFAULT_FALLBACK_VERSION: &str = "14.25.1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    /// Region sent with every live-game query.
    pub region: String,
    pub locale: String,
    /// Used whenever the versions endpoint cannot be reached.
    pub fallback_version: String,
    pub youtube_api_key: Option<String>,
    pub youtube_backup_key: Option<String>,
    pub request_timeout: Duration,
    pub requests_per_second: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: DEFAULT_REGION.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            fallback_version: DEFAULT_FALLBACK_VERSION.to_string(),
            youtube_api_key: None,
            youtube_backup_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            requests_per_second: NonZeroU32::new(DEFAULT_REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        // Blank values in .env count as unset
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::ConfigError(format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let requests_per_second = match get("HTTP_REQUESTS_PER_SECOND") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    AppError::ConfigError(format!(
                        "HTTP_REQUESTS_PER_SECOND must be a positive number, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.requests_per_second,
        };

        Ok(Config {
            region: get("LIVE_GAME_REGION").unwrap_or(defaults.region),
            locale: get("DDRAGON_LOCALE").unwrap_or(defaults.locale),
            fallback_version: get("DDRAGON_FALLBACK_VERSION").unwrap_or(defaults.fallback_version),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_backup_key: get("YOUTUBE_API_KEY_BACKUP"),
            request_timeout: Duration::from_secs(timeout_secs),
            requests_per_second,
        })
    }
}
