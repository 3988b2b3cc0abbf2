use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use glpi_common::error::{MigrateError, MigrateResult};

const DEFAULT_BATCH_SIZE: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FOLLOWUP_ITEMTYPE: &str = "TicketFollowup";

/// Connection settings for one GLPI instance.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// API root, e.g. `https://glpi.example/apirest.php`, without a trailing slash.
    pub base_url: String,
    /// Empty when the GLPI API client does not require one.
    pub app_token: String,
    pub auth_key: String,
}

impl EndpointConfig {
    pub fn new(base_url: &str, app_token: &str, auth_key: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            app_token: app_token.to_owned(),
            auth_key: auth_key.to_owned(),
        }
    }
}

/// Everything the migration run needs, read once at startup.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub source: EndpointConfig,
    pub destination: EndpointConfig,
    pub batch_size: u32,
    /// Upper bound on pages fetched from the source.
    pub max_pages: u32,
    pub default_user_id: i64,
    pub default_user_email: String,
    pub users_mapping_path: PathBuf,
    pub error_log_path: PathBuf,
    pub http_timeout_secs: u64,
    /// Destination itemtype used when creating follow-ups.
    pub followup_itemtype: String,
}

impl MigrationConfig {
    /// Load configuration from environment variables.
    /// The caller loads `.env` beforehand.
    pub fn from_env() -> MigrateResult<Self> {
        let source = EndpointConfig::new(
            &get_var("OLD_BASE_URL")?,
            &get_var_or("OLD_APP_TOKEN", ""),
            &get_var("OLD_AUTH_KEY")?,
        );
        let destination = EndpointConfig::new(
            &get_var("NEW_BASE_URL")?,
            &get_var_or("NEW_APP_TOKEN", ""),
            &get_var("NEW_AUTH_KEY")?,
        );

        let batch_size: u32 = parse_var_or("BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(MigrateError::Config("BATCH_SIZE must be greater than 0".to_owned()));
        }
        let max_pages: u32 = parse_var_or("MAX_PAGES", batch_size)?;

        let default_user_id: i64 = parse_var("NEW_GLPI_DEFAULT_USER_ID")?;
        let default_user_email = get_var("NEW_GLPI_DEFAULT_USER_EMAIL")?;

        Ok(Self {
            source,
            destination,
            batch_size,
            max_pages,
            default_user_id,
            default_user_email,
            users_mapping_path: PathBuf::from(get_var_or("USERS_MAPPING_PATH", "users.json")),
            error_log_path: PathBuf::from(get_var_or("ERROR_LOG_PATH", "error.log")),
            http_timeout_secs: parse_var_or("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            followup_itemtype: get_var_or("NEW_FOLLOWUP_ITEMTYPE", DEFAULT_FOLLOWUP_ITEMTYPE),
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn get_var(key: &str) -> MigrateResult<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MigrateError::Config(format!("{key} is required but not set"))),
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T: FromStr>(key: &str) -> MigrateResult<T>
where
    T::Err: std::fmt::Display,
{
    get_var(key)?
        .trim()
        .parse()
        .map_err(|e| MigrateError::Config(format!("invalid {key}: {e}")))
}

fn parse_var_or<T: FromStr>(key: &str, default: T) -> MigrateResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| MigrateError::Config(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
