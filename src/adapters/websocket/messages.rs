//! WebSocket message types for the sync hub.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: Connection status, relayed events, pongs, errors
//! - Client → Server: Identify, item sync, pings

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConnectionId, ErrorCode, Timestamp};
use crate::domain::sync::SyncPayload;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection accepted; carries the transport-assigned id.
    Connected(ConnectedMessage),

    /// Server-initiated event, e.g. `SyncReceived`.
    Event(EventMessage),

    /// Heartbeat response.
    Pong(PongMessage),

    /// Error occurred while handling a client message.
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn connected(connection_id: ConnectionId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            connection_id: connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn event(event: impl Into<String>, payload: SyncPayload) -> Self {
        ServerMessage::Event(EventMessage {
            event: event.into(),
            payload,
        })
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.to_string(),
            message: message.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

/// Sent once when the socket is accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub timestamp: String,
}

/// Named event pushed to a client.
#[derive(Debug, Clone, Serialize)]
pub struct EventMessage {
    pub event: String,
    pub payload: SyncPayload,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Present a previously issued token.
    Identify { token: String },

    /// Announce that an item changed.
    SyncItem {
        identifier: String,
        #[serde(default)]
        args: serde_json::Value,
    },

    /// Heartbeat request.
    Ping,
}
