//! Navigation control tools.
//!
//! `salesbuildr_navigate` enters a domain and `salesbuildr_back` returns to
//! the root. Their descriptors are built here; the state changes they cause
//! are applied by the request router.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::navigation::Domain;

/// Arguments of the navigation tool.
///
/// The advertised schema is built per registry by [`NavigateTool::to_tool`]
/// so that it only offers the registered domains.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateParams {
    /// Domain to enter.
    pub domain: Domain,
}

/// The back tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BackParams {}

pub struct NavigateTool;

impl NavigateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "salesbuildr_navigate";

    /// Build the descriptor, documenting each registered domain.
    pub fn to_tool<'a>(domains: impl IntoIterator<Item = (Domain, &'a str)>) -> Tool {
        let domains: Vec<(Domain, &str)> = domains.into_iter().collect();
        let listing = domains
            .iter()
            .map(|(domain, description)| format!("- {}: {}", domain, description))
            .collect::<Vec<_>>()
            .join("\n");

        let description = format!(
            "Enter a SalesBuildr domain to reveal its tools. Call this first; \
             use {} to return here and pick another domain.\n\nDomains:\n{}",
            BackTool::NAME,
            listing
        );

        Tool::new(
            Self::NAME,
            description,
            Self::input_schema(domains.iter().map(|(domain, _)| *domain)),
        )
    }

    /// Object schema with a required `domain` limited to `domains`.
    fn input_schema(domains: impl IntoIterator<Item = Domain>) -> JsonObject {
        let ids: Vec<Value> = domains.into_iter().map(|d| json!(d.as_str())).collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert(
            "properties".to_string(),
            json!({
                "domain": {
                    "type": "string",
                    "enum": ids,
                    "description": "Domain to enter."
                }
            }),
        );
        schema.insert("required".to_string(), json!(["domain"]));
        schema
    }
}

pub struct BackTool;

impl BackTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "salesbuildr_back";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Leave the current domain and return to the domain list.";

    pub fn to_tool() -> Tool {
        Tool::new(
            Self::NAME,
            Self::DESCRIPTION,
            cached_schema_for_type::<BackParams>(),
        )
    }
}
