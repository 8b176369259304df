//! Live WebSocket connection tracking.
//!
//! Each accepted socket gets a bounded outbound channel. Everything written
//! to the socket goes through that channel, drained by the socket's send
//! task, so pushes never wait on the network.
//!
//! ```text
//! SyncHub ──push_to──▶ ConnectionManager ──mpsc──▶ send task ──▶ socket
//! ```

use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::foundation::ConnectionId;
use crate::domain::sync::SyncPayload;
use crate::ports::ClientNotifier;

use super::messages::ServerMessage;

/// Default per-connection outbound buffer.
pub const DEFAULT_CONNECTION_BUFFER: usize = 64;

/// Registry of open sockets and their outbound channels.
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, mpsc::Sender<ServerMessage>>,
    buffer: usize,
}

impl ConnectionManager {
    /// Create a manager whose connections buffer up to `buffer` messages.
    ///
    /// A client that falls `buffer` messages behind starts losing pushes.
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Track a new socket. Returns its id and the receiver its send task drains.
    pub fn register(&self) -> (ConnectionId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let connection_id = ConnectionId::new();
        self.connections.insert(connection_id, tx);
        tracing::info!(connection_id = %connection_id, "Registered sync connection");
        (connection_id, rx)
    }

    /// Stop tracking a socket. Dropping the sender ends its send task.
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if self.connections.remove(connection_id).is_some() {
            tracing::info!(connection_id = %connection_id, "Unregistered sync connection");
        }
    }

    /// Queue a message for one connection without waiting.
    pub fn send(&self, connection_id: &ConnectionId, message: ServerMessage) -> bool {
        // Clone the sender so no shard lock is held while sending.
        let Some(tx) = self.connections.get(connection_id).map(|e| e.value().clone()) else {
            tracing::debug!(connection_id = %connection_id, "Dropping message for unknown connection");
            return false;
        };

        match tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %connection_id, "Outbound buffer full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(connection_id = %connection_id, "Connection closed, dropping message");
                false
            }
        }
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_BUFFER)
    }
}

impl ClientNotifier for ConnectionManager {
    fn push_to(&self, connection_id: &ConnectionId, event: &str, payload: SyncPayload) -> bool {
        self.send(connection_id, ServerMessage::event(event, payload))
    }

    fn connected_clients(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }
}
