//! Transport layer for the MCP server.
//!
//! - **STDIO**: standard input/output, one implicit session - feature: `stdio`
//! - **TCP**: line-delimited JSON-RPC, one session per connection - feature: `tcp`
//! - **HTTP**: JSON-RPC over POST, sessions keyed by `Mcp-Session-Id` - feature: `http`
//!
//! Every transport hands messages to [`McpServer`](crate::core::McpServer);
//! they differ only in how sessions are created and where credentials come
//! from.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
