//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the sync hub to external systems:
//! - `authorization` - Token registry implementations
//! - `websocket` - Socket transport and push delivery
//! - `http` - Token issuance, health, and router assembly

pub mod authorization;
pub mod http;
pub mod websocket;

pub use authorization::InMemoryConnectionAuthorizer;
pub use http::app_router;
pub use websocket::{ConnectionManager, WebSocketState};
