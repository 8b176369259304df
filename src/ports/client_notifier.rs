//! ClientNotifier port - Fire-and-forget pushes to live connections.
//!
//! The relay never waits for delivery. Implementations hand the message to
//! the transport and return immediately; a push that cannot be queued is
//! dropped and logged by the implementation.

use crate::domain::foundation::ConnectionId;
use crate::domain::sync::SyncPayload;

/// Port for pushing server-initiated events to connected clients.
pub trait ClientNotifier: Send + Sync {
    /// Queue `event` carrying `payload` for delivery to `connection_id`.
    ///
    /// Returns `true` if the message was handed to the transport. The
    /// return value says nothing about whether the client received it.
    fn push_to(&self, connection_id: &ConnectionId, event: &str, payload: SyncPayload) -> bool;

    /// All connections currently open at the transport level.
    fn connected_clients(&self) -> Vec<ConnectionId>;
}
