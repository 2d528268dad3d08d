//! Domains module containing business logic organized by bounded contexts.
//!
//! - **navigation**: session state and the domain tree clients move through
//! - **tools**: per-domain SalesBuildr tools, the registry and the request router

pub mod navigation;
pub mod tools;
