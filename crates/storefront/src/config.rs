//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (postgres backend only)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `CATALOG_BACKEND` - `memory` or `postgres` (default: memory)
//! - `STOREFRONT_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `STOREFRONT_CORS_ORIGINS` - Comma-separated allowed origins (default: <http://localhost:5173>)
//! - `STOREFRONT_PUBLIC_URL` - Public base URL (default: `http://localhost:{port}`)
//! - `STOREFRONT_PLACEHOLDER_IMAGES` - Serve generated SVG images (default: false)
//! - `LOG_FORMAT` - `json` for flattened JSON logs
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the catalog is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogBackend {
    /// Built-in fixture catalog held in memory.
    #[default]
    Memory,
    /// `catalog.*` tables in `PostgreSQL`.
    Postgres,
}

impl FromStr for CatalogBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("expected 'memory' or 'postgres', got '{other}'")),
        }
    }
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (contains password)
    pub url: SecretString,
    /// Maximum pool size
    pub max_connections: u32,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog backend
    pub backend: CatalogBackend,
    /// Database settings; present whenever the backend is `Postgres`
    pub database: Option<DatabaseConfig>,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Public base URL, used for placeholder image links
    pub public_url: Url,
    /// Rewrite catalog image URLs to generated placeholders
    pub placeholder_images: bool,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_env(&env, "STOREFRONT_HOST", "127.0.0.1")?;
        let port: u16 = parse_env(&env, "STOREFRONT_PORT", "5000")?;
        let backend: CatalogBackend = parse_env(&env, "CATALOG_BACKEND", "memory")?;

        let database = match backend {
            CatalogBackend::Memory => None,
            CatalogBackend::Postgres => Some(DatabaseConfig {
                url: get_database_url(&env, "STOREFRONT_DATABASE_URL")?,
                max_connections: parse_env(&env, "STOREFRONT_DB_MAX_CONNECTIONS", "10")?,
            }),
        };

        let cors_origins = get_env_or_default(&env, "STOREFRONT_CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let public_url = get_env_or_default(&env, "STOREFRONT_PUBLIC_URL", &format!("http://localhost:{port}"));
        let public_url = Url::parse(&public_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_PUBLIC_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            host,
            port,
            backend,
            database,
            cors_origins,
            public_url,
            placeholder_images: parse_env(&env, "STOREFRONT_PLACEHOLDER_IMAGES", "false")?,
            log_json: get_optional_env(&env, "LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env(&env, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&env, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(&env, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env(&env, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Defaults for the in-memory catalog on `port`, ignoring the process
    /// environment. Used by tests and local tooling.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the parsing path of [`Self::from_lookup`].
    pub fn memory(port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| (key == "STOREFRONT_PORT").then(|| port.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(env, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    env: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    get_optional_env(env, primary_key)
        .or_else(|| get_optional_env(env, "DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}
