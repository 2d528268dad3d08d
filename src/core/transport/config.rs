//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport: one client, one session.
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport: one session per connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP JSON-RPC transport: sessions keyed by `Mcp-Session-Id`.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Seconds without a request after which a session is dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Most sessions kept at once.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

#[cfg(feature = "http")]
pub(crate) const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[cfg(feature = "http")]
pub(crate) const DEFAULT_MAX_SESSIONS: usize = 1000;

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
fn default_session_idle_secs() -> u64 {
    DEFAULT_SESSION_IDLE_SECS
}

#[cfg(feature = "http")]
fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn env_number<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using {}", key, value, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    fn from_env() -> Self {
        Self {
            port: env_number("MCP_TCP_PORT", 3000u16),
            host: std::env::var("MCP_TCP_HOST").unwrap_or_else(|_| default_host()),
        }
    }

    /// Address to bind, `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    fn from_env() -> Self {
        let rpc_path = std::env::var("MCP_HTTP_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(default_rpc_path);
        let enable_cors = std::env::var("MCP_HTTP_CORS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
            .unwrap_or_else(|_| default_cors());

        Self {
            port: env_number("MCP_HTTP_PORT", 8080u16),
            host: std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host()),
            rpc_path,
            enable_cors,
            session_idle_secs: env_number("MCP_HTTP_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            max_sessions: env_number("MCP_HTTP_MAX_SESSIONS", DEFAULT_MAX_SESSIONS),
        }
    }

    /// Address to bind, `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl TransportConfig {
    /// Load transport config from `MCP_TRANSPORT` and the per-transport
    /// variables.
    ///
    /// A transport this build was compiled without falls back to the
    /// default one with a warning.
    pub fn from_env() -> Self {
        let requested = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match requested.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            "" => Self::default(),
            other => {
                let fallback = Self::default();
                warn!(
                    "Transport '{}' is not available in this build, using {}",
                    other,
                    fallback.description()
                );
                fallback
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}", cfg.bind_address()),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}{}", cfg.bind_address(), cfg.rpc_path),
        }
    }

    /// Whether this transport carries per-request headers.
    pub fn is_http(&self) -> bool {
        #[cfg(feature = "http")]
        {
            matches!(self, Self::Http(_))
        }
        #[cfg(not(feature = "http"))]
        {
            false
        }
    }
}
