//! Domain handler contract.
//!
//! Every navigable domain supplies one [`DomainHandler`]: the ordered list of
//! operations it exposes and the dispatch from an operation to a single
//! upstream call. The registry turns those into named MCP tools.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde_json::Value;

use super::error::ToolError;
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;

/// Operation kinds a domain can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation a domain exposes, before it is given a tool name.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub verb: Verb,
    pub description: &'static str,
    pub input_schema: Arc<JsonObject>,
}

impl ToolSpec {
    /// Describe an operation whose arguments deserialize into `P`.
    pub fn new<P>(verb: Verb, description: &'static str) -> Self
    where
        P: JsonSchema + 'static,
    {
        Self {
            verb,
            description,
            input_schema: cached_schema_for_type::<P>(),
        }
    }
}

/// Handler for all tools of one domain.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// The domain served by this handler.
    fn domain(&self) -> Domain;

    /// Exposed operations, in the order clients should see them.
    fn tools(&self) -> Vec<ToolSpec>;

    /// Run `verb` with the caller's arguments, making one upstream call.
    async fn execute(
        &self,
        verb: Verb,
        arguments: JsonObject,
        api: &dyn SalesBuildrApi,
    ) -> Result<Value, ToolError>;
}
