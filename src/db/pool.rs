//! Connection pool lifecycle and the scoped query helper.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteRow, SqliteSynchronous,
};
use sqlx::Arguments;

use crate::errors::AppError;

/// Limits applied to the connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Hard cap on concurrently open connections
    pub max_connections: u32,
    /// Unused connections are closed after this long
    pub idle_timeout: Duration,
    /// Acquisition fails with `ConnectionTimeout` after this long
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            idle_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_millis(2000),
        }
    }
}

/// A bind parameter for [`query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Text(String),
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

/// Build a pool without opening any connection.
///
/// The first statement executed through the pool opens the first connection.
pub fn connect_lazy(db_path: &Path, settings: &PoolSettings) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .idle_timeout(settings.idle_timeout)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options)
}

/// Drain the pool and close every connection.
pub async fn close(pool: &SqlitePool) {
    tracing::info!("Closing database pool ({} open connections)", pool.size());
    pool.close().await;
}

/// Execute a parameterized statement on a freshly acquired connection.
///
/// The connection returns to the pool when the guard drops, whether the statement succeeded
/// or not.
pub async fn query(pool: &SqlitePool, sql: &str, params: &[Param]) -> Result<Vec<SqliteRow>, AppError> {
    let mut conn = pool.acquire().await?;

    let mut args = SqliteArguments::default();
    for param in params {
        let bound = match param {
            Param::Int(v) => args.add(*v),
            Param::Text(v) => args.add(v.clone()),
        };
        bound.map_err(|e| AppError::Internal(format!("Failed to bind parameter: {}", e)))?;
    }

    let rows = sqlx::query_with(sql, args).fetch_all(&mut *conn).await?;
    Ok(rows)
}
