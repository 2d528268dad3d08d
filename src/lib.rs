//! SalesBuildr MCP Server Library
//!
//! Exposes the SalesBuildr CRM and quoting API to MCP clients as a small
//! tree of domains. A session starts at the root with a single navigation
//! tool; entering a domain swaps in that domain's tools plus a way back.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the MCP server handler, transports and
//!   the SalesBuildr API client
//! - **domains**: business logic organized by bounded contexts
//!   - **navigation**: the domain set and per-session navigation state
//!   - **tools**: per-domain tools, the registry and the request router
//!
//! # Example
//!
//! ```rust,no_run
//! use salesbuildr_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
