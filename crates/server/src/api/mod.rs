use crate::config::AppState;
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use locintel_mcp::protocol::{JsonRpcError, JsonRpcResponse, PROTOCOL_VERSION};
use serde_json::Value;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Start the API server
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("MCP endpoint listening on http://{}/mcp", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/mcp", post(mcp_endpoint))
        .route("/health", get(health_check))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), check_origin))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.allowed_origins.is_empty() {
        return CorsLayer::new();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Browsers always send `Origin` on cross-origin calls; refuse the ones not configured.
async fn check_origin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !state.allowed_origins.iter().any(|allowed| allowed == origin) {
            tracing::warn!(origin = ?origin, "Rejected request from unknown origin");
            return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
        }
    }
    next.run(request).await
}

/// One JSON-RPC message per POST. Notifications are acknowledged with 202 and no body.
async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let response = match std::str::from_utf8(&body) {
        Ok(text) => state.mcp.handle_line(text).await,
        Err(e) => Some(JsonRpcResponse::error(
            Value::Null,
            JsonRpcError::parse_error(e.to_string()),
        )),
    };

    match response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.mcp.info().name,
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": PROTOCOL_VERSION,
        "tools": state.mcp.registry().len(),
    }))
}
