//! Tool Registry - central registration of every domain and its tools.
//!
//! This module provides:
//! - The ordered set of domain descriptors and their handlers
//! - A name -> (domain, verb) table built once at registration
//! - The visible tool set for any navigation state

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::info;

use super::definitions::{
    BackTool, CompaniesHandler, ContactsHandler, NAMESPACE, NavigateTool, OpportunitiesHandler,
    ProductsHandler, QuotesHandler,
};
use super::{DomainHandler, ToolError, Verb};
use crate::domains::navigation::{Domain, NavigationState};

/// Where a registered tool name dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolTarget {
    pub domain: Domain,
    pub verb: Verb,
}

/// Everything registered for one domain.
pub struct DomainDescriptor {
    pub domain: Domain,
    pub description: &'static str,
    pub tools: Vec<Tool>,
    handler: Arc<dyn DomainHandler>,
}

impl DomainDescriptor {
    pub fn handler(&self) -> &Arc<dyn DomainHandler> {
        &self.handler
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| &*t.name)
    }
}

/// Tool registry - immutable after construction.
pub struct ToolRegistry {
    domains: Vec<DomainDescriptor>,
    targets: HashMap<String, ToolTarget>,
    navigate_tool: Tool,
    back_tool: Tool,
}

/// Tool name for a domain operation, e.g. `salesbuildr_quotes_create`.
pub fn tool_name(domain: Domain, verb: Verb) -> String {
    format!("{}_{}_{}", NAMESPACE, domain, verb)
}

impl ToolRegistry {
    /// Register the given handlers, in order.
    ///
    /// Fails if a domain is registered twice or two tools share a name.
    pub fn new(handlers: Vec<Arc<dyn DomainHandler>>) -> Result<Self, ToolError> {
        let mut domains: Vec<DomainDescriptor> = Vec::with_capacity(handlers.len());
        let mut targets = HashMap::new();

        for handler in handlers {
            let domain = handler.domain();
            if domains.iter().any(|d| d.domain == domain) {
                return Err(ToolError::registration(format!(
                    "domain '{}' registered twice",
                    domain
                )));
            }

            let mut tools = Vec::new();
            for spec in handler.tools() {
                let name = tool_name(domain, spec.verb);
                let target = ToolTarget {
                    domain,
                    verb: spec.verb,
                };
                if targets.insert(name.clone(), target).is_some()
                    || name == NavigateTool::NAME
                    || name == BackTool::NAME
                {
                    return Err(ToolError::registration(format!(
                        "tool '{}' registered twice",
                        name
                    )));
                }
                tools.push(Tool::new(name, spec.description, spec.input_schema));
            }

            domains.push(DomainDescriptor {
                domain,
                description: domain.description(),
                tools,
                handler,
            });
        }

        let navigate_tool = NavigateTool::to_tool(domains.iter().map(|d| (d.domain, d.description)));

        info!(
            "Registered {} domains with {} tools",
            domains.len(),
            targets.len()
        );

        Ok(Self {
            domains,
            targets,
            navigate_tool,
            back_tool: BackTool::to_tool(),
        })
    }

    /// Registry with the five SalesBuildr domains.
    pub fn with_default_domains() -> Result<Self, ToolError> {
        let handlers: Vec<Arc<dyn DomainHandler>> = vec![
            Arc::new(CompaniesHandler),
            Arc::new(ContactsHandler),
            Arc::new(ProductsHandler),
            Arc::new(OpportunitiesHandler),
            Arc::new(QuotesHandler),
        ];
        Self::new(handlers)
    }

    /// Registered domains, in registration order.
    pub fn domains(&self) -> &[DomainDescriptor] {
        &self.domains
    }

    /// Descriptor of one domain.
    pub fn domain(&self, domain: Domain) -> Option<&DomainDescriptor> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Comma-separated identifiers of every registered domain.
    pub fn domain_list(&self) -> String {
        self.domains
            .iter()
            .map(|d| d.domain.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Where `name` dispatches, if it is a registered domain tool.
    pub fn resolve(&self, name: &str) -> Option<ToolTarget> {
        self.targets.get(name).copied()
    }

    pub fn navigate_tool(&self) -> &Tool {
        &self.navigate_tool
    }

    pub fn back_tool(&self) -> &Tool {
        &self.back_tool
    }

    /// Tools a session in `state` can see.
    ///
    /// Root shows only the navigation tool; inside a domain the back tool
    /// comes first, followed by that domain's tools in registration order.
    pub fn visible_tools(&self, state: NavigationState) -> Vec<Tool> {
        match state {
            NavigationState::Root => vec![self.navigate_tool.clone()],
            NavigationState::InDomain(domain) => {
                let mut tools = vec![self.back_tool.clone()];
                if let Some(descriptor) = self.domain(domain) {
                    tools.extend(descriptor.tools.iter().cloned());
                }
                tools
            }
        }
    }

    /// Every tool name, navigation tools included.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names = vec![NavigateTool::NAME, BackTool::NAME];
        for descriptor in &self.domains {
            names.extend(descriptor.tool_names());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[Tool]) -> Vec<String> {
        tools.iter().map(|t| t.name.to_string()).collect()
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::with_default_domains().unwrap();
        let names = registry.tool_names();
        assert_eq!(names.len(), 21);
        assert!(names.contains(&"salesbuildr_navigate"));
        assert!(names.contains(&"salesbuildr_back"));
        assert!(names.contains(&"salesbuildr_companies_delete"));
        assert!(names.contains(&"salesbuildr_contacts_update"));
        assert!(names.contains(&"salesbuildr_products_get"));
        assert!(names.contains(&"salesbuildr_opportunities_update"));
        assert!(names.contains(&"salesbuildr_quotes_create"));
        assert!(!names.contains(&"salesbuildr_products_create"));
    }

    #[test]
    fn test_root_shows_only_navigation() {
        let registry = ToolRegistry::with_default_domains().unwrap();
        assert_eq!(
            names(&registry.visible_tools(NavigationState::Root)),
            vec!["salesbuildr_navigate"]
        );
    }

    #[test]
    fn test_domain_shows_back_then_domain_tools() {
        let registry = ToolRegistry::with_default_domains().unwrap();
        for descriptor in registry.domains() {
            let visible = registry.visible_tools(NavigationState::InDomain(descriptor.domain));
            let mut expected = vec![BackTool::NAME.to_string()];
            expected.extend(descriptor.tool_names().map(str::to_string));
            assert_eq!(names(&visible), expected);
            assert!((2..=5).contains(&descriptor.tools.len()));
        }
    }

    #[test]
    fn test_quotes_tools_in_order() {
        let registry = ToolRegistry::with_default_domains().unwrap();
        assert_eq!(
            names(&registry.visible_tools(NavigationState::InDomain(Domain::Quotes))),
            vec![
                "salesbuildr_back",
                "salesbuildr_quotes_list",
                "salesbuildr_quotes_get",
                "salesbuildr_quotes_create",
            ]
        );
    }

    #[test]
    fn test_resolve_parses_names_once() {
        let registry = ToolRegistry::with_default_domains().unwrap();
        assert_eq!(
            registry.resolve("salesbuildr_companies_update"),
            Some(ToolTarget {
                domain: Domain::Companies,
                verb: Verb::Update
            })
        );
        assert_eq!(registry.resolve("salesbuildr_companies"), None);
        assert_eq!(registry.resolve("salesbuildr_navigate"), None);
        assert_eq!(registry.resolve("salesbuildr_products_delete"), None);
    }

    #[test]
    fn test_duplicate_domain_is_rejected() {
        let handlers: Vec<Arc<dyn DomainHandler>> =
            vec![Arc::new(QuotesHandler), Arc::new(QuotesHandler)];
        assert!(matches!(
            ToolRegistry::new(handlers),
            Err(ToolError::Registration(_))
        ));
    }

    #[test]
    fn test_registry_order_follows_registration() {
        let handlers: Vec<Arc<dyn DomainHandler>> =
            vec![Arc::new(QuotesHandler), Arc::new(CompaniesHandler)];
        let registry = ToolRegistry::new(handlers).unwrap();
        assert_eq!(registry.domain_list(), "quotes, companies");
        assert!(registry.domain(Domain::Contacts).is_none());
    }

    #[test]
    fn test_navigate_schema_follows_registration() {
        let handlers: Vec<Arc<dyn DomainHandler>> =
            vec![Arc::new(QuotesHandler), Arc::new(CompaniesHandler)];
        let registry = ToolRegistry::new(handlers).unwrap();
        let root = registry.visible_tools(NavigationState::Root);
        assert_eq!(
            root[0].input_schema["properties"]["domain"]["enum"],
            serde_json::json!(["quotes", "companies"])
        );
    }
}
