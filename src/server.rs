//! HTTP API.
//!
//! `GET /roadmap/{topic}` returns the roadmap JSON produced for `topic`.
//! Errors are JSON objects of the form `{"error": "..."}`.

use crate::app::AppContext;
use crate::error::CodemapError;
use axum::{
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn};

/// Shared application state.
pub type AppState = Arc<AppContext>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        info_span!(
            "request",
            id = %uuid::Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/health", get(health))
        .route("/roadmap/{topic}", get(roadmap))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Serve the API on an already-bound listener until the process stops.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// HTTP status for a failed generation.
pub fn error_status(err: &CodemapError) -> StatusCode {
    match err {
        CodemapError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn roadmap(State(state): State<AppState>, Path(topic): Path<String>) -> Response {
    match state.service().generate(&topic).await {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            output.body,
        )
            .into_response(),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                error!("Roadmap for '{}' failed: {}", topic, e);
            } else {
                warn!("Rejected roadmap request: {}", e);
            }
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
