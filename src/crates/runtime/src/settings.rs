//! Runtime configuration, parsed once at startup into an immutable struct
//! held in `AppState`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Scope for the cross-thread memory store's shared namespace pseudo-id.
/// `"org"` lets every user in an org read/write the `shared` namespace;
/// `"user"` disables cross-user sharing entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncScope {
    Org,
    User,
}

impl std::str::FromStr for SyncScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "org" => Ok(SyncScope::Org),
            "user" => Ok(SyncScope::User),
            other => Err(format!("unknown AGENT_SYNC_SCOPE: {other}")),
        }
    }
}

impl Default for SyncScope {
    fn default() -> Self {
        SyncScope::Org
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub log_format: LogFormat,
    pub jwt_secret: String,
    pub sync_scope: SyncScope,
    pub langfuse_public_key: Option<String>,
    pub langfuse_secret_key: Option<String>,
    pub langfuse_host: Option<String>,
    pub rag_timeout: Duration,
    pub tool_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl RuntimeConfig {
    /// Load from environment variables, applying typed defaults for
    /// everything except `DATABASE_URL` and `SUPABASE_JWT_SECRET`, which
    /// a production deployment must always set explicitly.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = required_var("DATABASE_URL")?;
        let jwt_secret = required_var("SUPABASE_JWT_SECRET")?;

        let max_connections = optional_var("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|_| SettingsError::InvalidValue("DATABASE_MAX_CONNECTIONS".into(), "not an integer".into()))?;

        let bind_addr = optional_var("BIND_ADDR", "0.0.0.0:8000");

        let log_format = optional_var("LOG_FORMAT", "pretty")
            .parse()
            .map_err(|e| SettingsError::InvalidValue("LOG_FORMAT".into(), e))?;

        let sync_scope = optional_var("AGENT_SYNC_SCOPE", "org")
            .parse()
            .map_err(|e| SettingsError::InvalidValue("AGENT_SYNC_SCOPE".into(), e))?;

        let rag_timeout_secs: u64 = optional_var("RAG_TIMEOUT_SECONDS", "30")
            .parse()
            .map_err(|_| SettingsError::InvalidValue("RAG_TIMEOUT_SECONDS".into(), "not an integer".into()))?;

        let tool_timeout_secs: u64 = optional_var("TOOL_TIMEOUT_SECONDS", "60")
            .parse()
            .map_err(|_| SettingsError::InvalidValue("TOOL_TIMEOUT_SECONDS".into(), "not an integer".into()))?;

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            log_format,
            jwt_secret,
            sync_scope,
            langfuse_public_key: std::env::var("LANGFUSE_PUBLIC_KEY").ok(),
            langfuse_secret_key: std::env::var("LANGFUSE_SECRET_KEY").ok(),
            langfuse_host: std::env::var("LANGFUSE_HOST").ok(),
            rag_timeout: Duration::from_secs(rag_timeout_secs),
            tool_timeout: Duration::from_secs(tool_timeout_secs),
        })
    }

    pub fn langfuse_enabled(&self) -> bool {
        self.langfuse_public_key.is_some() && self.langfuse_secret_key.is_some()
    }
}

fn required_var(name: &str) -> Result<String, SettingsError> {
    std::env::var(name).map_err(|_| SettingsError::MissingVar(name.to_string()))
}

fn optional_var(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_database_url_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("SUPABASE_JWT_SECRET");
        assert!(RuntimeConfig::from_env().is_err());
    }

    #[test]
    fn loads_with_required_vars_and_typed_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("DATABASE_URL", "postgres://localhost/test");
        std::env::set_var("SUPABASE_JWT_SECRET", "secret-value-long-enough");
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        std::env::remove_var("AGENT_SYNC_SCOPE");

        let cfg = RuntimeConfig::from_env().unwrap();
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.sync_scope, SyncScope::Org);
        assert!(!cfg.langfuse_enabled());

        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("SUPABASE_JWT_SECRET");
    }

    #[test]
    fn log_format_parses_known_values() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("bogus".parse::<LogFormat>().is_err());
    }
}
