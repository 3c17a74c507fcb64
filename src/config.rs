use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// How the server verifies session tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionKeys {
    /// Key set published by the session provider.
    Jwks(String),
    /// HS256 secret shared with the session provider.
    Secret(String),
}

/// Backend settings, read from the environment (after `dotenv`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    /// URL prefix under which stored uploads are served.
    pub public_upload_base: String,
    pub max_upload_bytes: usize,
    pub session_keys: SessionKeys,
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let session_keys = match (lookup("SESSION_JWKS_URL"), lookup("SESSION_SECRET")) {
            (Some(url), _) => SessionKeys::Jwks(url),
            (None, Some(secret)) => SessionKeys::Secret(secret),
            (None, None) => return Err(ConfigError::Missing("SESSION_JWKS_URL or SESSION_SECRET")),
        };

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            public_upload_base: lookup("PUBLIC_UPLOAD_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "/uploads".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            session_keys,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", false)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Marketplace page settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub toast_ttl: Duration,
    pub coming_soon_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            page_size: 15,
            toast_ttl: Duration::from_millis(5000),
            coming_soon_delay: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_size: usize = parse_or(&lookup, "PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "PAGE_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_base_url: lookup("MARKETPLACE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            page_size,
            toast_ttl: Duration::from_millis(parse_or(&lookup, "TOAST_TTL_MS", 5000)?),
            coming_soon_delay: Duration::from_millis(parse_or(&lookup, "COMING_SOON_DELAY_MS", 500)?),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
