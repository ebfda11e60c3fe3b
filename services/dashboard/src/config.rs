//! services/dashboard/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Uploads larger than this are refused before touching the network.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which page the driver boots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Admin,
    Member,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub log_level: Level,
    pub page: PageKind,
    pub max_upload_bytes: u64,
    pub notice_delay: Duration,
    pub request_timeout: Duration,
    pub upload_path: Option<PathBuf>,
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            session_file: PathBuf::from(".smartdoc/session.json"),
            log_level: Level::INFO,
            page: PageKind::Member,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            notice_delay: Duration::from_millis(1500),
            request_timeout: Duration::from_secs(30),
            upload_path: None,
            assume_yes: false,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to the
    /// defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Endpoint and Storage ---
        let api_url = lookup("API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_url),
            ));
        }

        let session_file = lookup("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let page = match lookup("DASHBOARD_PAGE").as_deref() {
            None | Some("member") => PageKind::Member,
            Some("admin") => PageKind::Admin,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "DASHBOARD_PAGE".to_string(),
                    format!("'{}' is neither 'admin' nor 'member'", other),
                ))
            }
        };

        // --- Flow Tuning ---
        let max_upload_bytes = parse_number(&lookup, "MAX_UPLOAD_BYTES")?
            .unwrap_or(defaults.max_upload_bytes);
        let notice_delay = parse_number(&lookup, "NOTICE_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.notice_delay);
        let request_timeout = parse_number(&lookup, "REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        // --- Driver Settings ---
        let upload_path = lookup("UPLOAD_PATH").map(PathBuf::from);
        let assume_yes = match lookup("ASSUME_YES").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "ASSUME_YES".to_string(),
                    format!("'{}' is not a boolean", other),
                ))
            }
        };

        Ok(Self {
            api_url,
            session_file,
            log_level,
            page,
            max_upload_bytes,
            notice_delay,
            request_timeout,
            upload_path,
            assume_yes,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
        })
        .transpose()
}
