// ABOUTME: Thin demonstration HTTP binary exposing the bridge over axum
// Intentionally thin and not exhaustively tested — see SPEC_FULL.md External Interfaces

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use mcp_bridge_server::audit::InMemoryAuditSink;
use mcp_bridge_server::config::BridgeConfig;
use mcp_bridge_server::errors::AppResult;
use mcp_bridge_server::llm::HttpLmProvider;
use mcp_bridge_server::mcp::McpRegistry;
use mcp_bridge_server::models::{Role, User};
use mcp_bridge_server::request::{BridgeRequest, BridgeResponse};
use mcp_bridge_server::{bridge::Bridge, logging};
use std::collections::HashMap;
use std::sync::Arc;

struct AppState {
    bridge: Bridge,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = BridgeConfig::from_env()?;
    logging::init(&config.logging);

    let registry = Arc::new(McpRegistry::new(config.mcp_registry.clone()));
    let lm: Arc<dyn mcp_bridge_server::llm::LmProvider> =
        Arc::new(HttpLmProvider::from_env(config.agentic_loop.request_timeout)?);
    let audit_sink = Arc::new(InMemoryAuditSink::new());

    let bridge = Bridge::new(config, registry, lm, audit_sink, 1024);
    let state = Arc::new(AppState { bridge });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/request", post(handle_request))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.map_err(|e| {
        mcp_bridge_server::errors::AppError::internal(format!("failed to bind listener: {e}"))
    })?;
    tracing::info!("bridge-server listening on 0.0.0.0:8080");
    axum::serve(listener, app)
        .await
        .map_err(|e| mcp_bridge_server::errors::AppError::internal(format!("server error: {e}")))?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BridgeRequest>,
) -> Result<Json<BridgeResponse>, mcp_bridge_server::errors::AppError> {
    // Demonstration binary only: a real deployment resolves the calling
    // user (and their role) from an upstream auth layer, not a hardcoded map.
    let role = Role {
        name: "member".to_owned(),
        mcp_access: HashMap::new(),
        rate_limit_per_window: Some(60),
    };
    let user = User::new(request.user_id.clone(), role);
    let response = state.bridge.handle_request(&user, request).await?;
    Ok(Json(response))
}
