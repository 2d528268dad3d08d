//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over POST. `initialize` opens a session and returns its id
//! in the `Mcp-Session-Id` response header; every later request names its
//! session with the same header, and `DELETE` on the RPC path ends it.
//!
//! In `header` auth mode each `tools/call` builds a client from the
//! request's own API key header, so tenants never share a client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::navigation::Session;

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Protocol version answered when the client does not ask for one.
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }

    pub fn invalid_request(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32600, msg)
    }

    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

struct SessionEntry {
    session: Arc<Session>,
    last_seen: Instant,
}

/// Live HTTP sessions by id.
///
/// A session that sees no request for `idle_timeout` is dropped, and at
/// most `max_sessions` are kept; opening one more evicts the least
/// recently used.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Open a session at the root and return its id.
    pub async fn open(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    warn!("Session limit reached, evicting {}", oldest);
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }

        sessions.insert(
            id.clone(),
            SessionEntry {
                session: Arc::new(Session::new()),
                last_seen: now,
            },
        );
        id
    }

    /// Look up a live session and mark it as used.
    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        if now.duration_since(entry.last_seen) >= self.idle_timeout {
            sessions.remove(id);
            debug!("Session {} expired", id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    /// End a session. Returns whether it existed.
    pub async fn close(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every idle session. Returns how many were removed.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(super::config::DEFAULT_SESSION_IDLE_SECS),
            super::config::DEFAULT_MAX_SESSIONS,
        )
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    sessions: Arc<SessionStore>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.bind_address();
        let sessions = Arc::new(SessionStore::new(
            Duration::from_secs(self.config.session_idle_secs),
            self.config.max_sessions,
        ));
        spawn_session_sweeper(sessions.clone());
        let app = build_router_with_sessions(server, &self.config, sessions);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST/DELETE {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the axum router serving `server`.
pub fn build_router(server: McpServer, config: &HttpConfig) -> Router {
    let sessions = Arc::new(SessionStore::new(
        Duration::from_secs(config.session_idle_secs),
        config.max_sessions,
    ));
    build_router_with_sessions(server, config, sessions)
}

fn build_router_with_sessions(
    server: McpServer,
    config: &HttpConfig,
    sessions: Arc<SessionStore>,
) -> Router {
    let state = AppState { server, sessions };

    let mut app = Router::new()
        .route(&config.rpc_path, post(handle_rpc).delete(handle_delete))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Periodically drop sessions whose clients went away without `DELETE`.
fn spawn_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle().await;
            if evicted > 0 {
                info!("Evicted {} idle sessions", evicted);
            }
        }
    });
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "sessionHeader": SESSION_HEADER,
        "endpoints": {
            "health": "/health"
        },
        "documentation": "POST initialize to open a session, then send its Mcp-Session-Id with every request"
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "sessions": state.sessions.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// End a session.
async fn handle_delete(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let Some(id) = header_value(&headers, SESSION_HEADER) else {
        return StatusCode::BAD_REQUEST;
    };
    if state.sessions.close(&id).await {
        info!("Session {} closed", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());
    debug!("Received JSON-RPC request: {}", request.method);

    if request.jsonrpc != "2.0" {
        return rpc(StatusCode::OK, JsonRpcResponse::invalid_request(request.id, "jsonrpc must be \"2.0\""));
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(&state, request).await,
        "ping" => rpc(StatusCode::OK, JsonRpcResponse::success(request.id, json!({}))),
        method if method.starts_with("notifications/") => {
            debug!("Received notification: {}", method);
            StatusCode::ACCEPTED.into_response()
        }
        "tools/list" | "tools/call" => {
            let session = match resolve_session(&state, &headers, &request).await {
                Ok(session) => session,
                Err(response) => return response,
            };
            if request.method == "tools/list" {
                handle_tools_list(&state, &session, request).await
            } else {
                handle_tools_call(&state, &session, &headers, request).await
            }
        }
        _ => {
            warn!("Unknown method: {}", request.method);
            rpc(
                StatusCode::OK,
                JsonRpcResponse::method_not_found(request.id, &request.method),
            )
        }
    }
}

fn rpc(status: StatusCode, response: JsonRpcResponse) -> Response {
    (status, Json(response)).into_response()
}

/// Look up the session named by the request headers.
async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
    request: &JsonRpcRequest,
) -> Result<Arc<Session>, Response> {
    let Some(id) = header_value(headers, SESSION_HEADER) else {
        return Err(rpc(
            StatusCode::BAD_REQUEST,
            JsonRpcResponse::invalid_request(
                request.id.clone(),
                "Missing Mcp-Session-Id header; call initialize first",
            ),
        ));
    };

    state.sessions.get(&id).await.ok_or_else(|| {
        rpc(
            StatusCode::NOT_FOUND,
            JsonRpcResponse::invalid_request(
                request.id.clone(),
                format!("Unknown session '{}'; call initialize again", id),
            ),
        )
    })
}

async fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> Response {
    let protocol_version = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION)
        .to_string();

    let session_id = state.sessions.open().await;
    info!("Session {} opened", session_id);

    let result = json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": true }
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": state.server.instructions()
    });

    (
        StatusCode::OK,
        [(SESSION_HEADER, session_id)],
        Json(JsonRpcResponse::success(request.id, result)),
    )
        .into_response()
}

async fn handle_tools_list(
    state: &AppState,
    session: &Session,
    request: JsonRpcRequest,
) -> Response {
    let tools = state.server.router().list_tools(session).await;
    match serde_json::to_value(&tools) {
        Ok(tools) => rpc(
            StatusCode::OK,
            JsonRpcResponse::success(request.id, json!({ "tools": tools })),
        ),
        Err(e) => rpc(
            StatusCode::OK,
            JsonRpcResponse::internal_error(request.id, e.to_string()),
        ),
    }
}

async fn handle_tools_call(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    request: JsonRpcRequest,
) -> Response {
    let params = request.params.unwrap_or_else(|| json!({}));

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return rpc(
            StatusCode::OK,
            JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
        );
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => Default::default(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return rpc(
                StatusCode::OK,
                JsonRpcResponse::invalid_params(request.id, "arguments must be an object"),
            );
        }
    };

    let auth_header = &state.server.config().auth.header_name;
    let scope = state
        .server
        .client_scope(header_value(headers, auth_header));

    let routed = state
        .server
        .router()
        .call_tool(session, name, arguments, &scope)
        .await;
    if routed.tools_changed {
        debug!("Tool list changed; clients re-list on their next request");
    }

    match serde_json::to_value(&routed.result) {
        Ok(result) => rpc(StatusCode::OK, JsonRpcResponse::success(request.id, result)),
        Err(e) => rpc(
            StatusCode::OK,
            JsonRpcResponse::internal_error(request.id, e.to_string()),
        ),
    }
}
