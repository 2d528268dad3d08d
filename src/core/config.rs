//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults. Everything except the per-request tenant credential is read
//! once at process start.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default SalesBuildr public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://portal.salesbuildr.com/public-api";

/// Default header carrying a tenant's API key in multi-tenant mode.
pub const DEFAULT_AUTH_HEADER: &str = "x-salesbuildr-api-key";

/// Environment variable holding the shared API key.
pub const API_KEY_ENV: &str = "SALESBUILDR_API_KEY";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream SalesBuildr API settings.
    pub credentials: CredentialsConfig,

    /// Where API keys come from.
    pub auth: AuthConfig,

    /// Tool navigation behaviour.
    pub navigation: NavigationConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the upstream SalesBuildr API.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Shared API key used in `env` auth mode.
    pub api_key: Option<String>,

    /// Base URL of the SalesBuildr public API.
    pub base_url: String,

    /// Per-request timeout for upstream calls, in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Source of the API key used for upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// One key from the process environment, shared by every session.
    #[default]
    Env,

    /// Each HTTP request carries its tenant's key in a header.
    Header,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,

    /// Header read in `header` mode (matched case-insensitively).
    pub header_name: String,
}

/// Navigation behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Reject domain tool calls unless the session is inside that domain.
    pub strict: bool,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Env,
            header_name: DEFAULT_AUTH_HEADER.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "salesbuildr-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            auth: AuthConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Never logs, so it can run before a subscriber is installed; the rest
    /// of [`Config::from_env`] warns about bad values and needs one.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = parse_flag(&timestamps).unwrap_or(true);
        }

        logging
    }
}

impl AuthMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "env" | "environment" => Some(Self::Env),
            "header" | "headers" => Some(Self::Header),
            _ => None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_AUTH_MODE`, ...); upstream settings use the
    /// `SALESBUILDR_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.transport = TransportConfig::from_env();

        if let Ok(mode) = std::env::var("MCP_AUTH_MODE") {
            match AuthMode::parse(&mode) {
                Some(mode) => config.auth.mode = mode,
                None => warn!("Unknown MCP_AUTH_MODE '{}', falling back to 'env'", mode),
            }
        }

        if let Ok(header) = std::env::var("MCP_AUTH_HEADER") {
            if !header.trim().is_empty() {
                config.auth.header_name = header.trim().to_lowercase();
            }
        }

        if let Ok(strict) = std::env::var("MCP_STRICT_NAVIGATION") {
            config.navigation.strict = parse_flag(&strict).unwrap_or(false);
        }

        match std::env::var(API_KEY_ENV) {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.credentials.api_key = Some(api_key.trim().to_string());
                info!("SalesBuildr API key loaded from environment");
            }
            _ if config.auth.mode == AuthMode::Env => {
                warn!(
                    "{} not set - SalesBuildr tool calls will fail until it is configured",
                    API_KEY_ENV
                );
            }
            _ => {}
        }

        if let Ok(base_url) = std::env::var("SALESBUILDR_BASE_URL") {
            config.credentials.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("SALESBUILDR_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.credentials.timeout_secs = secs,
                Err(_) => warn!("Invalid SALESBUILDR_TIMEOUT_SECS '{}', keeping default", timeout),
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // Mutex to ensure env var tests run serially
    pub(crate) static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            API_KEY_ENV,
            "SALESBUILDR_BASE_URL",
            "SALESBUILDR_TIMEOUT_SECS",
            "MCP_AUTH_MODE",
            "MCP_AUTH_HEADER",
            "MCP_STRICT_NAVIGATION",
            "MCP_LOG_LEVEL",
            "MCP_LOG_TIMESTAMPS",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            std::env::set_var(API_KEY_ENV, "test_key_12345");
            std::env::set_var("SALESBUILDR_BASE_URL", "https://sandbox.example.com/api");
        }
        let config = Config::from_env();
        assert_eq!(config.credentials.api_key.as_deref(), Some("test_key_12345"));
        assert_eq!(config.credentials.base_url, "https://sandbox.example.com/api");
        clear_env();
    }

    #[test]
    fn test_missing_api_key_stays_unset() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let config = Config::from_env();
        assert!(config.credentials.api_key.is_none());
        assert_eq!(config.credentials.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_auth_mode_and_navigation_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            std::env::set_var("MCP_AUTH_MODE", "Header");
            std::env::set_var("MCP_AUTH_HEADER", "X-Tenant-Key");
            std::env::set_var("MCP_STRICT_NAVIGATION", "true");
        }
        let config = Config::from_env();
        assert_eq!(config.auth.mode, AuthMode::Header);
        assert_eq!(config.auth.header_name, "x-tenant-key");
        assert!(config.navigation.strict);
        clear_env();
    }

    #[test]
    fn test_unknown_auth_mode_falls_back_to_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            std::env::set_var("MCP_AUTH_MODE", "oauth");
        }
        let config = Config::from_env();
        assert_eq!(config.auth.mode, AuthMode::Env);
        clear_env();
    }

    #[test]
    fn test_logging_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "off");
        }
        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "debug");
        assert!(!logging.with_timestamps);

        let config = Config::from_env();
        assert_eq!(config.logging.level, "debug");
        clear_env();
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_from_env_warnings_reach_installed_subscriber() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            std::env::set_var("MCP_AUTH_MODE", "oauth");
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let logging = LoggingConfig::from_env();
            assert_eq!(logging.level, "info");
            Config::from_env();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Unknown MCP_AUTH_MODE 'oauth'"), "{output}");
        clear_env();
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            api_key: Some("super_secret_key".to_string()),
            ..Default::default()
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth.mode, AuthMode::Env);
        assert_eq!(config.auth.header_name, DEFAULT_AUTH_HEADER);
        assert!(!config.navigation.strict);
        assert_eq!(config.credentials.timeout_secs, 30);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
