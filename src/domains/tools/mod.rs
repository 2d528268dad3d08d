//! Tools domain module.
//!
//! Everything a client can call: the two navigation tools, the per-domain
//! CRUD tools, and the router deciding which of them a call reaches.
//!
//! ## Architecture
//!
//! - `definitions/` - One file per SalesBuildr domain plus the navigation tools
//! - `handlers.rs` - The `DomainHandler` trait every domain implements
//! - `registry.rs` - Domain registration and visible tool sets
//! - `router.rs` - Per-call dispatch and envelope normalization
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Domain
//!
//! 1. Add a variant to `Domain`
//! 2. Create a handler in `definitions/` implementing `DomainHandler`
//! 3. Register it in `ToolRegistry::with_default_domains`

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::*;
pub use registry::{DomainDescriptor, ToolRegistry, ToolTarget, tool_name};
pub use router::{RequestRouter, RoutedCall};
