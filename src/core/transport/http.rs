//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over POST. Besides the MCP methods (`initialize`,
//! `tools/list`, `tools/call`) the five prompt operations are callable
//! directly by their JSON-RPC method names. The `Authorization: Bearer`
//! header supplies the API key for the call.

use ::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{Operation, ToolError};

/// Protocol version reported by `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
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
        Self::error_with_data(id, code, message, None)
    }

    /// Create an error response carrying structured data.
    pub fn error_with_data(
        id: Option<Value>,
        code: i32,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    /// Parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, -32700, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }

    /// Map a failed tool call onto a JSON-RPC error.
    ///
    /// Prompt errors are internal errors tagged with their kind.
    pub fn tool_error(id: Option<Value>, err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments(msg) => Self::invalid_params(id, msg),
            ToolError::NotFound(_) => Self::method_not_found(id),
            ToolError::Prompt(e) => Self::error_with_data(
                id,
                -32603,
                e.to_string(),
                Some(json!({ "kind": e.kind() })),
            ),
            ToolError::Internal(msg) => Self::internal_error(id, msg),
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router.
    pub fn router(&self, server: McpServer) -> Router {
        let rpc_path = self.config.rpc_path.clone();
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route(
                "/",
                get(move |State(state): State<AppState>| {
                    root_handler(state, rpc_path.clone())
                }),
            )
            .with_state(AppState { server })
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

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
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(state: AppState, rpc_path: String) -> impl IntoResponse {
    let methods: Vec<&str> = crate::domains::tools::OPERATIONS
        .iter()
        .map(|spec| spec.rpc_method)
        .collect();

    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": &rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "methods": methods,
        "documentation": format!("Send POST requests to {} with JSON-RPC messages", rpc_path)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Extract the API key from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

/// Handle JSON-RPC requests.
#[instrument(skip_all)]
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let bearer = bearer_token(&headers);
    let response = process_body(&state.server, &body, bearer.as_deref()).await;
    (StatusCode::OK, Json(response))
}

/// Parse a raw request body and process it.
async fn process_body(server: &McpServer, body: &str, bearer: Option<&str>) -> JsonRpcResponse {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Rejected unparseable JSON-RPC body: {}", e);
            return JsonRpcResponse::parse_error(format!("Parse error: {}", e));
        }
    };

    let id = value.get("id").cloned();
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => process_request(server, request, bearer).await,
        Err(_) => JsonRpcResponse::invalid_request(id),
    }
}

/// Process a JSON-RPC request and return the response.
async fn process_request(
    server: &McpServer,
    request: JsonRpcRequest,
    bearer: Option<&str>,
) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    info!("Received JSON-RPC request: {}", request.method);

    match request.method.as_str() {
        "initialize" => handle_initialize(server, request),

        "tools/list" => handle_tools_list(server, request),

        "tools/call" => handle_tools_call(server, request, bearer).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }

        method => match Operation::from_rpc_method(method) {
            Some(operation) => handle_operation(server, operation, request, bearer).await,
            None => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::method_not_found(request.id)
            }
        },
    }
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": "Manage prompts stored in the LangSmith prompt hub. \
                         Send your API key as an Authorization: Bearer header."
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");
    JsonRpcResponse::success(request.id, json!({ "tools": server.list_tools() }))
}

/// Handle tools/call request.
///
/// Prompt failures are reported MCP-style, as an `isError` result.
async fn handle_tools_call(
    server: &McpServer,
    request: JsonRpcRequest,
    bearer: Option<&str>,
) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(Value::as_str) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

    match server.call_tool(&name, arguments, bearer).await {
        Ok(reply) => JsonRpcResponse::success(
            request.id,
            json!({
                "content": [{ "type": "text", "text": reply.summary }],
                "structuredContent": reply.structured,
                "isError": false
            }),
        ),
        Err(ToolError::Prompt(e)) => {
            warn!("Tool {} failed: {}", name, e);
            JsonRpcResponse::success(
                request.id,
                json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "isError": true
                }),
            )
        }
        Err(ToolError::NotFound(_)) => {
            JsonRpcResponse::invalid_params(request.id, format!("Unknown tool: {}", name))
        }
        Err(e) => JsonRpcResponse::tool_error(request.id, e),
    }
}

/// Handle a prompt operation called directly by its JSON-RPC method name.
async fn handle_operation(
    server: &McpServer,
    operation: Operation,
    request: JsonRpcRequest,
    bearer: Option<&str>,
) -> JsonRpcResponse {
    let arguments = request.params.unwrap_or(json!({}));
    match server.call_operation(operation, arguments, bearer).await {
        Ok(reply) => JsonRpcResponse::success(request.id, reply.structured),
        Err(e) => {
            warn!("{} failed: {}", operation.spec().rpc_method, e);
            JsonRpcResponse::tool_error(request.id, e)
        }
    }
}
