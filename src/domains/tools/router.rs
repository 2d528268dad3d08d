//! Request Router - turns a tool call into a response envelope.
//!
//! Dispatch order:
//! 1. the navigation tool changes the session's domain
//! 2. the back tool returns the session to the root
//! 3. a registered domain tool is handed to its domain handler
//! 4. anything else is reported as unknown
//!
//! Every failure becomes an `isError` envelope; nothing propagates past
//! [`RequestRouter::call_tool`].

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{error, info, instrument, warn};

use super::definitions::common::parse_params;
use super::definitions::{
    BackTool, NavigateParams, NavigateTool, error_result, json_result, success_result,
};
use super::ToolError;
use super::registry::{ToolRegistry, ToolTarget};
use crate::core::upstream::{ClientAccessor, ClientScope};
use crate::domains::navigation::{NavigationState, Session, Transition};

/// Result of routing one call.
#[derive(Debug, Clone)]
pub struct RoutedCall {
    /// Envelope to return to the caller.
    pub result: CallToolResult,

    /// Whether the session's visible tool set changed.
    pub tools_changed: bool,
}

impl RoutedCall {
    fn unchanged(result: CallToolResult) -> Self {
        Self {
            result,
            tools_changed: false,
        }
    }
}

/// Routes tool calls for any number of sessions.
///
/// The router itself is stateless: navigation state lives in the
/// [`Session`] passed with each call.
pub struct RequestRouter {
    registry: Arc<ToolRegistry>,
    clients: Arc<ClientAccessor>,
    strict_navigation: bool,
}

impl RequestRouter {
    /// Create a router over `registry`, calling the API through `clients`.
    pub fn new(registry: Arc<ToolRegistry>, clients: Arc<ClientAccessor>) -> Self {
        Self {
            registry,
            clients,
            strict_navigation: false,
        }
    }

    /// Only accept domain tool calls for the session's current domain.
    pub fn with_strict_navigation(mut self, strict: bool) -> Self {
        self.strict_navigation = strict;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn clients(&self) -> &Arc<ClientAccessor> {
        &self.clients
    }

    /// Tools visible to `session` right now.
    pub async fn list_tools(&self, session: &Session) -> Vec<Tool> {
        self.registry.visible_tools(session.state().await)
    }

    /// Route one tool call.
    #[instrument(skip(self, session, arguments, scope))]
    pub async fn call_tool(
        &self,
        session: &Session,
        name: &str,
        arguments: JsonObject,
        scope: &ClientScope,
    ) -> RoutedCall {
        match name {
            NavigateTool::NAME => self.navigate(session, arguments).await,
            BackTool::NAME => self.back(session).await,
            _ => match self.registry.resolve(name) {
                Some(target) => {
                    RoutedCall::unchanged(self.dispatch(session, name, target, arguments, scope).await)
                }
                None => {
                    warn!("Unknown tool requested: {}", name);
                    RoutedCall::unchanged(error_result(&format!(
                        "Unknown tool: {}. Call {} to enter a domain (one of: {}) and list its tools first.",
                        name,
                        NavigateTool::NAME,
                        self.registry.domain_list()
                    )))
                }
            },
        }
    }

    async fn navigate(&self, session: &Session, arguments: JsonObject) -> RoutedCall {
        let params: NavigateParams = match parse_params(arguments) {
            Ok(params) => params,
            Err(e) => {
                return RoutedCall::unchanged(error_result(&format!(
                    "{} for {}. Expected {{\"domain\": one of {}}}.",
                    e,
                    NavigateTool::NAME,
                    self.registry.domain_list()
                )));
            }
        };

        if self.registry.domain(params.domain).is_none() {
            return RoutedCall::unchanged(error_result(&format!(
                "Domain '{}' is not available. Choose one of: {}",
                params.domain,
                self.registry.domain_list()
            )));
        }

        let (previous, current) = session.apply(Transition::Navigate(params.domain)).await;
        info!("Navigated to {}", params.domain);

        let visible = self
            .registry
            .visible_tools(current)
            .iter()
            .map(|t| t.name.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        RoutedCall {
            result: success_result(format!(
                "Navigated to {}. Available tools: {}",
                params.domain, visible
            )),
            tools_changed: previous != current,
        }
    }

    async fn back(&self, session: &Session) -> RoutedCall {
        let (previous, current) = session.apply(Transition::Back).await;
        if previous != current {
            info!("Returned to root");
        }

        RoutedCall {
            result: success_result(format!(
                "Returned to the domain list. Available domains: {}. Call {} to enter one.",
                self.registry.domain_list(),
                NavigateTool::NAME
            )),
            tools_changed: previous != current,
        }
    }

    async fn dispatch(
        &self,
        session: &Session,
        name: &str,
        target: ToolTarget,
        arguments: JsonObject,
        scope: &ClientScope,
    ) -> CallToolResult {
        if self.strict_navigation {
            let state = session.state().await;
            if state != NavigationState::InDomain(target.domain) {
                warn!(?state, "Rejected {} outside its domain", name);
                return error_result(&format!(
                    "{} belongs to the {} domain. Call {} with domain \"{}\" first.",
                    name,
                    target.domain,
                    NavigateTool::NAME,
                    target.domain
                ));
            }
        }

        let Some(descriptor) = self.registry.domain(target.domain) else {
            return error_result(&ToolError::not_found(name).to_string());
        };

        let api = match self.clients.resolve(scope).await {
            Ok(api) => api,
            Err(e) => return error_result(&e.to_string()),
        };

        match descriptor
            .handler()
            .execute(target.verb, arguments, api.as_ref())
            .await
        {
            Ok(value) => {
                info!("{} succeeded", name);
                json_result(&value)
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                error_result(&e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CredentialsConfig;
    use crate::core::upstream::fake::{ApiCall, FakeClientFactory, RecordingApi};
    use crate::domains::navigation::Domain;
    use crate::domains::tools::definitions::common::tests::args;
    use rmcp::model::RawContent;
    use serde_json::json;

    struct Harness {
        router: RequestRouter,
        api: Arc<RecordingApi>,
        factory: Arc<FakeClientFactory>,
    }

    fn harness_with(api: RecordingApi, strict: bool) -> Harness {
        let api = Arc::new(api);
        let factory = Arc::new(FakeClientFactory::new(api.clone()));
        let settings = CredentialsConfig {
            api_key: Some("env-key".to_string()),
            ..Default::default()
        };
        let clients = Arc::new(ClientAccessor::with_factory(settings, factory.clone()));
        let registry = Arc::new(ToolRegistry::with_default_domains().unwrap());
        Harness {
            router: RequestRouter::new(registry, clients).with_strict_navigation(strict),
            api,
            factory,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingApi::new(), false)
    }

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    async fn visible(h: &Harness, session: &Session) -> Vec<String> {
        h.router
            .list_tools(session)
            .await
            .iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    async fn call(h: &Harness, session: &Session, name: &str, arguments: serde_json::Value) -> RoutedCall {
        h.router
            .call_tool(session, name, args(arguments), &ClientScope::Shared)
            .await
    }

    #[tokio::test]
    async fn test_initial_state_lists_only_navigation() {
        let h = harness();
        let session = Session::new();
        assert_eq!(visible(&h, &session).await, vec![NavigateTool::NAME]);
    }

    #[tokio::test]
    async fn test_navigation_round_trip_for_every_domain() {
        let h = harness();
        let session = Session::new();
        for descriptor in h.router.registry().domains() {
            let routed = call(&h, &session, NavigateTool::NAME, json!({"domain": descriptor.domain})).await;
            assert!(routed.result.is_error.is_none());
            assert!(routed.tools_changed);

            let mut expected = vec![BackTool::NAME.to_string()];
            expected.extend(descriptor.tool_names().map(str::to_string));
            assert_eq!(visible(&h, &session).await, expected);

            let routed = call(&h, &session, BackTool::NAME, json!({})).await;
            assert!(routed.result.is_error.is_none());
            assert_eq!(visible(&h, &session).await, vec![NavigateTool::NAME]);
        }
    }

    #[tokio::test]
    async fn test_navigate_summary_lists_visible_tools() {
        let h = harness();
        let session = Session::new();
        let routed = call(&h, &session, NavigateTool::NAME, json!({"domain": "quotes"})).await;
        assert_eq!(
            text(&routed.result),
            "Navigated to quotes. Available tools: salesbuildr_back, salesbuildr_quotes_list, \
             salesbuildr_quotes_get, salesbuildr_quotes_create"
        );
    }

    #[tokio::test]
    async fn test_back_twice_from_root_is_noop() {
        let h = harness();
        let session = Session::new();
        for _ in 0..2 {
            let routed = call(&h, &session, BackTool::NAME, json!({})).await;
            assert!(routed.result.is_error.is_none());
            assert!(!routed.tools_changed);
            assert!(text(&routed.result).contains("companies, contacts, products, opportunities, quotes"));
            assert_eq!(visible(&h, &session).await, vec![NavigateTool::NAME]);
        }
    }

    #[tokio::test]
    async fn test_domain_switch_replaces_tools() {
        let h = harness();
        let session = Session::new();
        call(&h, &session, NavigateTool::NAME, json!({"domain": "companies"})).await;
        call(&h, &session, NavigateTool::NAME, json!({"domain": "products"})).await;
        assert_eq!(
            visible(&h, &session).await,
            vec!["salesbuildr_back", "salesbuildr_products_list", "salesbuildr_products_get"]
        );
    }

    #[tokio::test]
    async fn test_invalid_domain_is_contract_violation() {
        let h = harness();
        let session = Session::new();
        call(&h, &session, NavigateTool::NAME, json!({"domain": "contacts"})).await;

        let routed = call(&h, &session, NavigateTool::NAME, json!({"domain": "invoices"})).await;
        assert_eq!(routed.result.is_error, Some(true));
        assert!(!routed.tools_changed);
        assert_eq!(session.state().await, NavigationState::InDomain(Domain::Contacts));

        let routed = call(&h, &session, NavigateTool::NAME, json!({})).await;
        assert_eq!(routed.result.is_error, Some(true));
        assert!(text(&routed.result).contains("domain"));
    }

    #[tokio::test]
    async fn test_dispatch_ignores_navigation_state() {
        let h = harness();

        let at_root = Session::new();
        let routed = call(&h, &at_root, "salesbuildr_companies_get", json!({"id": "1"})).await;
        assert!(routed.result.is_error.is_none());

        let in_contacts = Session::new();
        call(&h, &in_contacts, NavigateTool::NAME, json!({"domain": "contacts"})).await;
        let routed = call(&h, &in_contacts, "salesbuildr_companies_get", json!({"id": "2"})).await;
        assert!(routed.result.is_error.is_none());
        assert_eq!(in_contacts.state().await, NavigationState::InDomain(Domain::Contacts));

        assert_eq!(
            h.api.calls(),
            vec![
                ApiCall::Get(Domain::Companies, "1".to_string()),
                ApiCall::Get(Domain::Companies, "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_strict_navigation_rejects_out_of_domain_calls() {
        let h = harness_with(RecordingApi::new(), true);
        let session = Session::new();

        let routed = call(&h, &session, "salesbuildr_companies_get", json!({"id": "1"})).await;
        assert_eq!(routed.result.is_error, Some(true));
        assert!(text(&routed.result).contains("\"companies\""));
        assert!(h.api.calls().is_empty());

        call(&h, &session, NavigateTool::NAME, json!({"domain": "companies"})).await;
        let routed = call(&h, &session, "salesbuildr_companies_get", json!({"id": "1"})).await;
        assert!(routed.result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_create_strips_identity() {
        let h = harness();
        let session = Session::new();
        call(&h, &session, "salesbuildr_companies_create", json!({"id": "x", "name": "Acme"})).await;
        assert_eq!(
            h.api.calls(),
            vec![ApiCall::Create(Domain::Companies, json!({"name": "Acme"}))]
        );
    }

    #[tokio::test]
    async fn test_update_separates_identity() {
        let h = harness();
        let session = Session::new();
        call(&h, &session, "salesbuildr_companies_update", json!({"id": "42", "name": "X"})).await;
        assert_eq!(
            h.api.calls(),
            vec![ApiCall::Update(Domain::Companies, "42".to_string(), json!({"name": "X"}))]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_leaves_state_unchanged() {
        let h = harness();
        let session = Session::new();
        call(&h, &session, NavigateTool::NAME, json!({"domain": "quotes"})).await;

        let routed = call(&h, &session, "salesbuildr_quotes_crate", json!({})).await;
        assert_eq!(routed.result.is_error, Some(true));
        assert!(!routed.tools_changed);
        assert!(text(&routed.result).contains("salesbuildr_quotes_crate"));
        assert!(text(&routed.result).contains(NavigateTool::NAME));
        assert_eq!(session.state().await, NavigationState::InDomain(Domain::Quotes));
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_envelope() {
        let h = harness_with(RecordingApi::failing(404, "Quote not found"), false);
        let session = Session::new();
        let routed = call(&h, &session, "salesbuildr_quotes_get", json!({"id": "9"})).await;
        assert_eq!(routed.result.is_error, Some(true));
        assert_eq!(routed.result.content.len(), 1);
        assert!(text(&routed.result).contains("Quote not found"));
    }

    #[tokio::test]
    async fn test_success_envelope_has_no_error_flag() {
        let h = harness();
        let session = Session::new();
        let routed = call(&h, &session, "salesbuildr_quotes_get", json!({"id": "9"})).await;
        assert!(routed.result.is_error.is_none());
        assert_eq!(routed.result.content.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(text(&routed.result)).unwrap();
        assert_eq!(parsed, json!({"id": "9"}));
    }

    #[tokio::test]
    async fn test_missing_credential_is_request_error() {
        let api = Arc::new(RecordingApi::new());
        let factory = Arc::new(FakeClientFactory::new(api.clone()));
        let clients = Arc::new(ClientAccessor::with_factory(CredentialsConfig::default(), factory));
        let router = RequestRouter::new(Arc::new(ToolRegistry::with_default_domains().unwrap()), clients);
        let session = Session::new();

        let routed = router
            .call_tool(&session, "salesbuildr_products_list", args(json!({})), &ClientScope::Shared)
            .await;
        assert_eq!(routed.result.is_error, Some(true));
        assert!(text(&routed.result).contains("SALESBUILDR_API_KEY"));

        // Navigation still works without credentials.
        let routed = router
            .call_tool(&session, NavigateTool::NAME, args(json!({"domain": "products"})), &ClientScope::Shared)
            .await;
        assert!(routed.result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_tenant_scope_builds_per_request_clients() {
        let h = harness();
        let session = Session::new();
        for key in ["tenant-a", "tenant-b"] {
            let scope = ClientScope::Tenant {
                header: "x-salesbuildr-api-key".to_string(),
                api_key: Some(key.to_string()),
            };
            h.router
                .call_tool(&session, "salesbuildr_contacts_list", args(json!({})), &scope)
                .await;
        }
        assert_eq!(h.factory.built_keys(), vec!["tenant-a".to_string(), "tenant-b".to_string()]);
    }

    #[tokio::test]
    async fn test_quote_scenario_end_to_end() {
        let h = harness();
        let session = Session::new();

        call(&h, &session, NavigateTool::NAME, json!({"domain": "quotes"})).await;
        assert_eq!(
            visible(&h, &session).await,
            vec![
                "salesbuildr_back",
                "salesbuildr_quotes_list",
                "salesbuildr_quotes_get",
                "salesbuildr_quotes_create",
            ]
        );

        let payload = json!({
            "title": "Q1",
            "items": [{"name": "Firewall", "quantity": 1, "unitPrice": 999}]
        });
        let routed = call(&h, &session, "salesbuildr_quotes_create", payload.clone()).await;
        assert!(routed.result.is_error.is_none());
        assert_eq!(h.api.calls(), vec![ApiCall::Create(Domain::Quotes, payload)]);

        call(&h, &session, BackTool::NAME, json!({})).await;
        assert_eq!(visible(&h, &session).await, vec![NavigateTool::NAME]);
    }
}
