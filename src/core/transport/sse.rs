//! SSE transport implementation.
//!
//! HTTP server speaking MCP over server-sent events:
//!
//! - `GET /sse` opens an event stream. The first event (`endpoint`) tells the
//!   client where to post, e.g. `/messages?sessionId=<uuid>`.
//! - `POST /messages?sessionId=<uuid>` accepts one JSON-RPC message. The reply
//!   is delivered as a `message` event on that session's stream.
//!
//! Sessions live in a [`SessionRegistry`] and are removed as soon as the
//! client drops its stream.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::stream::{self, Stream, StreamExt};
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{TransportError, TransportResult, config::SseConfig};
use crate::core::McpServer;

/// Protocol version reported when the client does not ask for one.
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

// ============================================================================
// Sessions
// ============================================================================

type SessionSender = mpsc::UnboundedSender<JsonRpcResponse>;

/// Map of open sessions, keyed by session id.
///
/// Opening and closing race with message posts from other clients, so every
/// access goes through the one mutex.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, SessionSender>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionSender>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new session. It stays registered until the returned
    /// [`Session`] is dropped.
    pub fn open(&self) -> Session {
        let id = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().insert(id.clone(), sender);
        debug!("Session {} opened", id);

        Session {
            id,
            receiver,
            registry: self.clone(),
        }
    }

    /// Look up the sender of an open session.
    pub fn sender(&self, id: &str) -> Option<SessionSender> {
        self.lock().get(id).cloned()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: &str) {
        if self.lock().remove(id).is_some() {
            debug!("Session {} closed", id);
        }
    }
}

/// One client's event stream.
pub struct Session {
    id: String,
    receiver: mpsc::UnboundedReceiver<JsonRpcResponse>,
    registry: SessionRegistry,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the next response routed to this session.
    pub async fn recv(&mut self) -> Option<JsonRpcResponse> {
        self.receiver.recv().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

// ============================================================================
// Transport
// ============================================================================

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    sessions: SessionRegistry,
    message_path: Arc<str>,
}

/// Query string of the message endpoint.
#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the HTTP router serving `server` over `sessions`.
    pub fn router(&self, server: McpServer, sessions: SessionRegistry) -> Router {
        let state = AppState {
            server,
            sessions,
            message_path: Arc::from(self.config.message_path.as_str()),
        };

        let mut app = Router::new()
            .route(&self.config.sse_path, get(handle_sse))
            .route(&self.config.message_path, post(handle_message))
            .route("/health", get(health_check))
            .with_state(state)
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

    /// Run the SSE transport until the server stops.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server.clone(), SessionRegistry::new());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("{} running on http://{}", server.name(), addr);
        info!("  → Events:   GET {}", self.config.sse_path);
        info!("  → Messages: POST {}?sessionId=<id>", self.config.message_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Open an event stream for a new session.
#[instrument(skip_all)]
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = state.sessions.open();
    info!("Client connected, session {}", session.id());

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?sessionId={}", state.message_path, session.id()));

    let messages = stream::unfold(session, |mut session| async move {
        loop {
            let response = session.recv().await?;
            match serde_json::to_string(&response) {
                Ok(data) => {
                    let event = Event::default().event("message").data(data);
                    return Some((Ok::<_, Infallible>(event), session));
                }
                Err(e) => warn!("Dropping unserializable response: {}", e),
            }
        }
    });

    Sse::new(stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages))
        .keep_alive(KeepAlive::default())
}

/// Accept a JSON-RPC message for an open session.
#[instrument(skip_all, fields(method))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());

    let Some(sender) = query
        .session_id
        .as_deref()
        .and_then(|id| state.sessions.sender(id))
    else {
        warn!("No transport found for sessionId {:?}", query.session_id);
        return (StatusCode::BAD_REQUEST, "No transport found for sessionId").into_response();
    };

    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = process_request(&server, request).await {
            // The client may have disconnected meanwhile; the reply is dropped.
            if sender.send(response).is_err() {
                debug!("Session closed before the response was delivered");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Process a JSON-RPC message. Notifications produce no response.
pub async fn process_request(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    if request.id.is_none() {
        handle_notification(&request);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    };

    Some(response)
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let protocol_version = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION)
        .to_string();

    let result = serde_json::json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": server.instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    match serde_json::to_value(server.list_tools()) {
        Ok(tools) => JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools })),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

/// Handle tools/call request.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments: JsonObject = match params.get("arguments") {
        None | Some(serde_json::Value::Null) => JsonObject::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::invalid_params(request.id, "Tool arguments must be an object");
        }
    };

    info!("Processing tools/call request for {}", name);

    let result = server.call_tool(&name, arguments).await;
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(request.id, value),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

/// Handle notifications (no response needed).
fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client sent initialized notification"),
        _ => debug!("Received notification: {}", request.method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_server() -> McpServer {
        McpServer::new(Config::new("test-key")).unwrap()
    }

    fn request(id: i64, method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(id)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn post_message(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = process_request(&test_server(), request(1, "tools/list", json!({})))
            .await
            .unwrap();

        let tools = response.result.unwrap()["tools"].clone();
        let names: Vec<_> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["web-search", "web-reader"]);
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = process_request(
            &test_server(),
            request(2, "tools/call", json!({ "name": "nonexistent-tool", "arguments": {} })),
        )
        .await
        .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["content"][0]["type"], json!("text"));
        assert_eq!(
            result["content"][0]["text"],
            json!("Unknown tool: nonexistent-tool")
        );
    }

    #[tokio::test]
    async fn test_tools_call_missing_name() {
        let response = process_request(&test_server(), request(3, "tools/call", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let response = process_request(
            &test_server(),
            request(0, "initialize", json!({ "protocolVersion": "2025-03-26" })),
        )
        .await
        .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!("2025-03-26"));
        assert_eq!(result["serverInfo"]["name"], json!("mcp-server/unifuncs"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = process_request(&test_server(), request(4, "resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let notification = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "notifications/initialized".to_string(),
            params: None,
        };
        assert!(process_request(&test_server(), notification).await.is_none());
    }

    #[test]
    fn test_session_removed_on_drop() {
        let sessions = SessionRegistry::new();
        let session = sessions.open();
        let id = session.id().to_string();
        assert!(sessions.sender(&id).is_some());

        drop(session);
        assert!(sessions.sender(&id).is_none());
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_post_unknown_session_is_bad_request() {
        let transport = SseTransport::new(SseConfig::default());
        let app = transport.router(test_server(), SessionRegistry::new());

        let response = app
            .oneshot(post_message(
                "/messages?sessionId=missing",
                json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"No transport found for sessionId");
    }

    #[tokio::test]
    async fn test_post_routes_response_to_session() {
        let sessions = SessionRegistry::new();
        let transport = SseTransport::new(SseConfig::default());
        let app = transport.router(test_server(), sessions.clone());

        let mut session = sessions.open();
        let uri = format!("/messages?sessionId={}", session.id());

        let response = app
            .oneshot(post_message(
                &uri,
                json!({ "jsonrpc": "2.0", "id": 7, "method": "tools/list" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let reply = session.recv().await.unwrap();
        assert_eq!(reply.id, Some(json!(7)));
        assert_eq!(reply.result.unwrap()["tools"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sse_stream_announces_endpoint() {
        let sessions = SessionRegistry::new();
        let transport = SseTransport::new(SseConfig::default());
        let app = transport.router(test_server(), sessions.clone());

        let response = app
            .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(sessions.len(), 1);

        let mut body = response.into_body();
        let frame = body.frame().await.unwrap().unwrap();
        let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
        assert!(text.contains("event: endpoint"));
        assert!(text.contains("data: /messages?sessionId="));

        drop(body);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let transport = SseTransport::new(SseConfig::default());
        let app = transport.router(test_server(), SessionRegistry::new());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
