//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the MCP server handler, the transports it
//! runs on, and the SalesBuildr API client.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;
pub mod upstream;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
