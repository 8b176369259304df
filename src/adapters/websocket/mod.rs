//! WebSocket adapters for the sync hub.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   client ── identify / sync_item / ping ──▶ ws_handler        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SyncHub                               │
//! │   identify → ConnectionAuthorizer::authorize                 │
//! │   sync_item → authorized ids minus caller → push_to          │
//! └──────────────────────────────────────────────────────────────┘
//!                               │ push_to
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   ConnectionManager                          │
//! │   conn-a ─▶ mpsc ─▶ socket     conn-b ─▶ mpsc ─▶ socket      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`connections`] - Open sockets and their outbound channels
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connections;
pub mod handler;
pub mod messages;

pub use connections::{ConnectionManager, DEFAULT_CONNECTION_BUFFER};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{
    ClientMessage, ConnectedMessage, ErrorMessage, EventMessage, PongMessage, ServerMessage,
};
