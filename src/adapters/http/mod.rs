//! HTTP adapters - Router assembly for the sync hub.
//!
//! Combines the WebSocket endpoint with the token and health endpoints and
//! applies the shared tracing and CORS layers.

pub mod sync;

pub use sync::{sync_router, SyncApiError, SyncAppState, ISSUER_KEY_HEADER};

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::adapters::websocket::{websocket_router, WebSocketState};

/// Create the complete application router.
///
/// # Routes
///
/// - `GET /hub/sync` - WebSocket sync hub
/// - `POST /api/sync/tokens` - Token issuance
/// - `GET /health` - Liveness
pub fn app_router(
    ws_state: WebSocketState,
    sync_state: SyncAppState,
    cors_origins: Vec<HeaderValue>,
) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    Router::new()
        .merge(websocket_router().with_state(ws_state))
        .merge(sync_router().with_state(sync_state))
        .layer(build_cors_layer(cors_origins))
        .layer(trace_layer)
}

/// CORS for the token endpoint. No configured origins means same-origin only.
///
/// Allowed origins may send the issuer key header.
fn build_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-sync-issuer-key"),
        ])
}
