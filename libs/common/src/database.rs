//! Database module for handling PostgreSQL connections and operations
//!
//! This module resolves the connection string from the environment, cleans up
//! the usual copy-paste artifacts, and hands out a lazily created connection
//! pool whose first use also ensures the schema exists.

use crate::error::{DatabaseError, DatabaseResult};
use crate::schema::ensure_schema;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::{env, sync::Arc, time::Duration};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use url::Url;

/// Primary environment variable holding the connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Fallback environment variable consulted when the primary one is unset
pub const FALLBACK_DATABASE_URL_VAR: &str = "NETLIFY_DATABASE_URL";

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Normalized database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig with default pool settings
    pub fn new(raw_url: &str) -> Self {
        Self {
            database_url: normalize_database_url(raw_url),
            max_connections: 5,
            connection_timeout: 30,
        }
    }

    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: PostgreSQL connection URL
    /// - `NETLIFY_DATABASE_URL`: fallback when `DATABASE_URL` is unset or empty
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Acquire timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let raw_url = [DATABASE_URL_VAR, FALLBACK_DATABASE_URL_VAR]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or(DatabaseError::NotConfigured)?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url: normalize_database_url(&raw_url),
            max_connections,
            connection_timeout,
        })
    }

    /// Connection URL with the password masked, safe to log
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.database_url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.to_string()
            }
            Ok(url) => url.to_string(),
            Err(_) => "<unparseable connection string>".to_string(),
        }
    }
}

/// Clean up a connection string pasted from a provider dashboard
///
/// Strips a leading `psql` invocation, surrounding quotes, rewrites the
/// `postgresql://` scheme to `postgres://` and removes any `channel_binding`
/// query parameter. Strings that do not parse as URLs are returned after the
/// textual cleanup so the driver can report them.
pub fn normalize_database_url(raw: &str) -> String {
    let mut value = raw.trim();

    if let Some(rest) = value.strip_prefix("psql") {
        if rest.starts_with(char::is_whitespace) {
            value = rest.trim_start();
        }
    }

    value = strip_matching_quotes(value);

    let value = match value.strip_prefix("postgresql://") {
        Some(rest) => format!("postgres://{rest}"),
        None => value.to_string(),
    };

    let mut url = match Url::parse(&value) {
        Ok(url) => url,
        Err(_) => return value,
    };

    if url.query_pairs().any(|(key, _)| key == "channel_binding") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "channel_binding")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        return url.to_string();
    }

    value
}

fn strip_matching_quotes(mut value: &str) -> &str {
    loop {
        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() >= 2
            && (bytes[0] == b'\'' || bytes[0] == b'"')
            && bytes[0] == bytes[bytes.len() - 1]
        {
            value = &trimmed[1..trimmed.len() - 1];
        } else {
            return trimmed;
        }
    }
}

/// Initialize a PostgreSQL connection pool
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<PgPool>` - PostgreSQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    info!("Initializing database connection pool for {}", config.redacted_url());

    let options: PgConnectOptions = config
        .database_url
        .parse()
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - PostgreSQL connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if connection is successful
pub async fn health_check(pool: &PgPool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(true)
}

/// Process-wide database handle
///
/// The pool is created on first use. Concurrent first callers wait on the
/// same initialization; a failed attempt is not remembered, so the next call
/// tries again.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    config: Option<DatabaseConfig>,
    pool: OnceCell<PgPool>,
}

impl Database {
    /// Create a handle; `None` means every access reports `NotConfigured`
    pub fn new(config: Option<DatabaseConfig>) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                config,
                pool: OnceCell::new(),
            }),
        }
    }

    /// Create a handle from environment variables
    pub fn from_env() -> Self {
        match DatabaseConfig::from_env() {
            Ok(config) => Self::new(Some(config)),
            Err(e) => {
                warn!("{}: data endpoints will answer 503", e);
                Self::new(None)
            }
        }
    }

    /// Whether a connection string was provided
    pub fn is_configured(&self) -> bool {
        self.inner.config.is_some()
    }

    /// Get the pool, connecting and creating the schema on first use
    pub async fn pool(&self) -> DatabaseResult<&PgPool> {
        let config = self
            .inner
            .config
            .as_ref()
            .ok_or(DatabaseError::NotConfigured)?;

        self.inner
            .pool
            .get_or_try_init(|| async {
                let pool = init_pool(config).await?;
                health_check(&pool).await?;
                ensure_schema(&pool).await?;
                info!("Database connection pool ready");
                Ok::<PgPool, DatabaseError>(pool)
            })
            .await
    }
}
