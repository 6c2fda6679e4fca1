//! Tool server configuration
//!
//! Read from the environment (after `.env`, if present). Server settings use
//! the `MCP_` prefix and database settings the `DB_` prefix.

use serde::Deserialize;
use std::time::Duration;

use infra_db::DatabaseConfig;

/// How the server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub transport: TransportKind,
    /// HTTP bind host
    pub host: String,
    /// HTTP bind port
    pub port: u16,
    /// Base URL of the document upload form
    pub upload_base_url: String,
    /// Base URL of the note generation service
    pub notes_base_url: String,
    pub notes_timeout_secs: u64,
    /// Registers the tool that sends a claim straight to review
    pub enable_review_submission: bool,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Stdio,
            host: "127.0.0.1".to_string(),
            port: 8765,
            upload_base_url: "http://localhost:8000".to_string(),
            notes_base_url: "http://localhost:8000".to_string(),
            notes_timeout_secs: 30,
            enable_review_submission: false,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `MCP_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("MCP").try_parsing(true))
    }

    /// Loads configuration from an explicit environment source
    pub fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("transport", "stdio")?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("upload_base_url", defaults.upload_base_url)?
            .set_default("notes_base_url", defaults.notes_base_url)?
            .set_default("notes_timeout_secs", defaults.notes_timeout_secs)?
            .set_default("enable_review_submission", defaults.enable_review_submission)?
            .set_default("log_level", defaults.log_level)?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Returns the HTTP bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn notes_timeout(&self) -> Duration {
        Duration::from_secs(self.notes_timeout_secs)
    }
}

/// Database connection settings
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    /// Loads settings from `DB_*` environment variables
    ///
    /// `DB_NAME`, `DB_USER`, and `DB_PASSWORD` have no default; a missing one
    /// fails startup.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("DB"))
    }

    /// Loads settings from an explicit environment source
    pub fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "localhost")?
            .set_default("port", 5432)?
            .set_default("max_connections", 5)?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Converts into the pool configuration
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.host, &self.name, &self.user, &self.password)
            .port(self.port)
            .max_connections(self.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(prefix: &str, vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(prefix)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_source(env("MCP", &[])).unwrap();
        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.server_addr(), "127.0.0.1:8765");
        assert_eq!(config.upload_base_url, "http://localhost:8000");
        assert_eq!(config.notes_timeout(), Duration::from_secs(30));
        assert!(!config.enable_review_submission);
    }

    #[test]
    fn test_server_overrides() {
        let config = ServerConfig::from_source(env(
            "MCP",
            &[
                ("MCP_TRANSPORT", "http"),
                ("MCP_PORT", "9000"),
                ("MCP_UPLOAD_BASE_URL", "https://os.example.com"),
                ("MCP_ENABLE_REVIEW_SUBMISSION", "true"),
            ],
        ))
        .unwrap();
        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.port, 9000);
        assert_eq!(config.upload_base_url, "https://os.example.com");
        assert!(config.enable_review_submission);
    }

    #[test]
    fn test_database_requires_credentials() {
        assert!(DatabaseSettings::from_source(env("DB", &[("DB_NAME", "obra_social")])).is_err());
    }

    #[test]
    fn test_database_settings_map_to_pool_config() {
        let settings = DatabaseSettings::from_source(env(
            "DB",
            &[
                ("DB_NAME", "obra_social"),
                ("DB_USER", "app"),
                ("DB_PASSWORD", "secret"),
                ("DB_PORT", "5433"),
            ],
        ))
        .unwrap();
        let config = settings.to_database_config();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5433);
        assert_eq!(config.max_connections, 5);
        assert!(!format!("{:?}", settings).contains("secret"));
    }
}
