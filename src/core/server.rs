//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] implements the rmcp `ServerHandler` trait by hand: the tool
//! list depends on where the session currently is, so it cannot come from a
//! static tool router. Every call goes through the shared
//! [`RequestRouter`]; the server only adds the session and the credential
//! scope.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use tracing::{debug, info, instrument, warn};

use super::config::{AuthMode, Config};
use super::error::Result;
use super::upstream::{ClientAccessor, ClientScope};
use crate::domains::navigation::Session;
use crate::domains::tools::{RequestRouter, ToolRegistry};

const INSTRUCTIONS: &str = "SalesBuildr CRM and quoting tools. Start with salesbuildr_navigate \
to enter a domain (companies, contacts, products, opportunities, quotes); its tools then \
appear in the tool list. Use salesbuildr_back to return to the domain list.";

/// The main MCP server handler.
///
/// Cloning shares the router and the session. Use
/// [`McpServer::with_fresh_session`] to serve an independent connection.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatch for every tool call.
    router: Arc<RequestRouter>,

    /// Navigation state of the connection this handler serves.
    session: Arc<Session>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// The SalesBuildr client is not built here; a missing API key only
    /// fails the tool calls that need it.
    pub fn new(config: Config) -> Result<Self> {
        let registry = Arc::new(ToolRegistry::with_default_domains()?);
        let clients = Arc::new(ClientAccessor::new(config.credentials.clone()));
        let router = RequestRouter::new(registry, clients)
            .with_strict_navigation(config.navigation.strict);

        if config.navigation.strict {
            info!("Strict navigation enabled");
        }

        Ok(Self::with_router(config, Arc::new(router)))
    }

    /// Create a server around an existing router.
    pub fn with_router(config: Config, router: Arc<RequestRouter>) -> Self {
        Self {
            config: Arc::new(config),
            router,
            session: Arc::new(Session::new()),
        }
    }

    /// A handler sharing this server's router but starting a new session.
    pub fn with_fresh_session(&self) -> Self {
        Self {
            config: self.config.clone(),
            router: self.router.clone(),
            session: Arc::new(Session::new()),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn router(&self) -> &Arc<RequestRouter> {
        &self.router
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Server instructions sent on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// Credential scope for a request carrying `header_value` in the
    /// configured auth header.
    ///
    /// In `env` mode the header is ignored and the shared client is used.
    pub fn client_scope(&self, header_value: Option<String>) -> ClientScope {
        match self.config.auth.mode {
            AuthMode::Env => ClientScope::Shared,
            AuthMode::Header => ClientScope::Tenant {
                header: self.config.auth.header_name.clone(),
                api_key: header_value,
            },
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_tool_list_changed()
                .build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let tools = self.router.list_tools(&self.session).await;
        debug!("Listing {} tools", tools.len());
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        let routed = self
            .router
            .call_tool(&self.session, &request.name, arguments, &ClientScope::Shared)
            .await;

        if routed.tools_changed {
            if let Err(e) = context.peer.notify_tool_list_changed().await {
                warn!("Failed to send tools/list_changed: {}", e);
            }
        }

        Ok(routed.result)
    }
}
