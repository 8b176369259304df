//! Coddee Sync server binary.
//!
//! Composition root: loads configuration, builds the registry, connection
//! manager, and hub, then serves the WebSocket and HTTP endpoints.

use std::sync::Arc;

use coddee_sync::adapters::http::{app_router, SyncAppState};
use coddee_sync::adapters::websocket::{ConnectionManager, WebSocketState};
use coddee_sync::adapters::InMemoryConnectionAuthorizer;
use coddee_sync::application::SyncHub;
use coddee_sync::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let connections = Arc::new(ConnectionManager::new(config.sync.connection_buffer));
    let hub = if config.sync.require_identification {
        SyncHub::new(Arc::new(InMemoryConnectionAuthorizer::new()), connections.clone())
    } else {
        tracing::warn!("Identification disabled, relaying to every connected client");
        SyncHub::without_authorization(connections.clone())
    };

    let sync_state = SyncAppState {
        authorizer: hub.authorizer().cloned(),
        connections: connections.clone(),
        issuer_key: config.sync.issuer_key.clone(),
    };
    let app = app_router(
        WebSocketState::new(hub, connections),
        sync_state,
        config.server.allowed_origins()?,
    );

    let addr = config.server.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Sync hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sync hub stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
