use std::env;
use std::str::FromStr;

use portfolio_core::media::cloudinary::{CloudinaryConfig, DEFAULT_API_BASE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Volatile; for local runs and tests.
    Memory,
}

/// Where images are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    Cloudinary,
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    pub storage: StorageBackend,
    /// PostgreSQL connection URL, required for the postgres backend.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    pub media: MediaBackend,
    /// Present whenever `media` is `Cloudinary`.
    pub cloudinary: Option<CloudinaryConfig>,
    /// Email of the single editor account.
    pub admin_email: String,
    /// Plain admin password, hashed at startup. Prefer `admin_password_hash`.
    pub admin_password: Option<String>,
    /// Argon2 PHC string for the admin password.
    pub admin_password_hash: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Lifetime of an admin session token, in seconds.
    pub jwt_ttl_secs: i64,
    /// Origins allowed by CORS; empty allows any.
    pub cors_allowed_origins: Vec<String>,
    /// Largest accepted request body, uploads included.
    pub max_upload_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            database_url: None,
            db_max_connections: 10,
            db_min_connections: 1,
            media: MediaBackend::Memory,
            cloudinary: None,
            admin_email: "admin@example.com".to_string(),
            admin_password: None,
            admin_password_hash: None,
            jwt_secret: "dev-secret-change-me-in-production".to_string(),
            jwt_ttl_secs: 86_400,
            cors_allowed_origins: Vec::new(),
            max_upload_bytes: 10 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    reason: format!("unknown backend {other:?}"),
                })
            }
        };
        let database_url = var("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let media = match var("MEDIA_BACKEND").as_deref() {
            None | Some("cloudinary") => MediaBackend::Cloudinary,
            Some("memory") => MediaBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "MEDIA_BACKEND",
                    reason: format!("unknown backend {other:?}"),
                })
            }
        };
        let cloudinary = match media {
            MediaBackend::Cloudinary => Some(CloudinaryConfig {
                cloud_name: var("CLOUDINARY_CLOUD_NAME")
                    .ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: var("CLOUDINARY_API_KEY")
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: var("CLOUDINARY_API_SECRET")
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
                folder: var("CLOUDINARY_FOLDER"),
                api_base: var("CLOUDINARY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            }),
            MediaBackend::Memory => None,
        };

        let admin_password = var("ADMIN_PASSWORD");
        let admin_password_hash = var("ADMIN_PASSWORD_HASH");
        // The built-in secret is public; only an all-memory dev setup without
        // a login may sign with it.
        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if storage == StorageBackend::Postgres
                || admin_password.is_some()
                || admin_password_hash.is_some() =>
            {
                return Err(ConfigError::Missing("JWT_SECRET"))
            }
            None => defaults.jwt_secret,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "PORT", defaults.port)?,
            storage,
            database_url,
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_min_connections: parse_or(&var, "DB_MIN_CONNECTIONS", defaults.db_min_connections)?,
            media,
            cloudinary,
            admin_email: var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password,
            admin_password_hash,
            jwt_secret,
            jwt_ttl_secs: parse_or(&var, "JWT_TTL_SECS", defaults.jwt_ttl_secs)?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
