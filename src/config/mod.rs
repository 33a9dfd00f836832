//! Configuration module for the Idea Spark backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::db::PoolSettings;

/// Error raised when an environment variable holds a value that cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings for the text generation provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the OpenAI-compatible provider; generation is disabled without it
    pub api_key: Option<String>,
    /// Base URL of the provider, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model identifier sent with every completion request
    pub model: String,
    /// Upper bound for a single completion call
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Connection pool limits
    pub pool: PoolSettings,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Text generation provider
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("IDEA_SPARK_DB_PATH")
            .unwrap_or_else(|_| "./data/idea_spark.sqlite".to_string())
            .into();

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: parse_var("IDEA_SPARK_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            idle_timeout: Duration::from_secs(parse_var(
                "IDEA_SPARK_DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
            acquire_timeout: Duration::from_millis(parse_var(
                "IDEA_SPARK_DB_ACQUIRE_TIMEOUT_MS",
                defaults.acquire_timeout.as_millis() as u64,
            )?),
        };

        let bind_addr = parse_var(
            "IDEA_SPARK_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?;

        let log_level = env::var("IDEA_SPARK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let llm = LlmConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: env::var("IDEA_SPARK_LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: env::var("IDEA_SPARK_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(parse_var("IDEA_SPARK_LLM_TIMEOUT_SECS", 60)?),
        };

        Ok(Self {
            db_path,
            pool,
            bind_addr,
            log_level,
            llm,
        })
    }
}

/// Read and parse an environment variable, falling back to `default` when it is unset.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
