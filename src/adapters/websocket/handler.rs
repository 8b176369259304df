//! WebSocket upgrade handler for sync hub connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Register the connection and send its id
//! 2. Forward queued server messages to the socket
//! 3. Dispatch client messages to the hub
//! 4. Revoke authorization and unregister on disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::task::JoinHandle;

use crate::application::SyncHub;
use crate::domain::foundation::{ConnectionId, ErrorCode, Token};

use super::{
    connections::ConnectionManager,
    messages::{ClientMessage, ServerMessage},
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    /// Relay invoked for each client call.
    pub hub: SyncHub,
    /// Outbound channels of every open socket.
    pub connections: Arc<ConnectionManager>,
}

impl WebSocketState {
    pub fn new(hub: SyncHub, connections: Arc<ConnectionManager>) -> Self {
        Self { hub, connections }
    }
}

/// Handle WebSocket upgrade requests for the sync hub.
///
/// Route: `GET /hub/sync`
///
/// Connections start unauthorized; clients identify over the socket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let (connection_id, mut outbound) = state.connections.register();

    if let Err(e) = send_message(&mut sender, &ServerMessage::connected(connection_id)).await {
        tracing::debug!(connection_id = %connection_id, "Failed to send connected message: {}", e);
        state.connections.unregister(&connection_id);
        return;
    }

    // Drain queued messages onto the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    handle_client_text(&recv_state, &connection_id, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level heartbeats are answered by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    join_socket_tasks(send_task, recv_task).await;

    state.hub.on_disconnect(&connection_id).await;
    state.connections.unregister(&connection_id);
}

/// Wait for either half of a socket to finish, then stop the other half.
///
/// Returns only once both tasks have stopped: a client call still running
/// in the receive task must not outlive the disconnect that follows.
async fn join_socket_tasks(mut send_task: JoinHandle<()>, mut recv_task: JoinHandle<()>) {
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
    }
}

/// Dispatch one text frame from a client.
async fn handle_client_text(state: &WebSocketState, connection_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, "Unparseable client message: {}", e);
            state.connections.send(
                connection_id,
                ServerMessage::error(ErrorCode::InvalidMessage, "Unrecognized message"),
            );
            return;
        }
    };

    match message {
        ClientMessage::Identify { token } => {
            state.hub.identify(connection_id, &Token::new(token)).await;
        }
        ClientMessage::SyncItem { identifier, args } => {
            state.hub.sync_item(connection_id, &identifier, args).await;
        }
        ClientMessage::Ping => {
            tracing::trace!(connection_id = %connection_id, "Received ping");
            state.connections.send(connection_id, ServerMessage::pong());
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Create axum router for the sync hub endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router().with_state(ws_state));
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/hub/sync", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::authorization::InMemoryConnectionAuthorizer;
    use crate::domain::foundation::AuthorizationError;
    use crate::domain::sync::AuthorizedConnection;
    use crate::ports::ConnectionAuthorizer;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Registry whose `authorize` blocks its worker thread before binding.
    struct SlowAuthorizer {
        inner: InMemoryConnectionAuthorizer,
        delay: Duration,
    }

    #[async_trait]
    impl ConnectionAuthorizer for SlowAuthorizer {
        async fn issue_token(&self) -> Token {
            self.inner.issue_token().await
        }

        async fn issue_token_for(&self, user: &str) -> Token {
            self.inner.issue_token_for(user).await
        }

        async fn authorize(
            &self,
            token: &Token,
            connection_id: &ConnectionId,
        ) -> Result<AuthorizedConnection, AuthorizationError> {
            // Blocking on purpose: abort() cannot interrupt a poll in progress.
            std::thread::sleep(self.delay);
            self.inner.authorize(token, connection_id).await
        }

        async fn revoke(&self, connection_id: &ConnectionId) {
            self.inner.revoke(connection_id).await
        }

        async fn authorized_connection_ids(&self) -> Vec<ConnectionId> {
            self.inner.authorized_connection_ids().await
        }

        async fn authorized_connection(
            &self,
            connection_id: &ConnectionId,
        ) -> Option<AuthorizedConnection> {
            self.inner.authorized_connection(connection_id).await
        }
    }

    fn test_state() -> (WebSocketState, Arc<InMemoryConnectionAuthorizer>) {
        let registry = Arc::new(InMemoryConnectionAuthorizer::new());
        let connections = Arc::new(ConnectionManager::default());
        let hub = SyncHub::new(registry.clone(), connections.clone());
        (WebSocketState::new(hub, connections), registry)
    }

    #[test]
    fn websocket_state_shares_connection_manager() {
        let (state, _) = test_state();
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.connections, &cloned.connections));
    }

    #[test]
    fn websocket_router_creates_route() {
        let _router = websocket_router();
    }

    #[tokio::test]
    async fn identify_text_authorizes_connection() {
        let (state, registry) = test_state();
        let (id, _rx) = state.connections.register();
        let token = registry.issue_token().await;

        let text = json!({"type": "identify", "token": token.as_str()}).to_string();
        handle_client_text(&state, &id, &text).await;

        assert_eq!(registry.authorized_connection_ids().await, vec![id]);
    }

    #[tokio::test]
    async fn ping_text_replies_with_pong() {
        let (state, _) = test_state();
        let (id, mut rx) = state.connections.register();

        handle_client_text(&state, &id, r#"{"type":"ping"}"#).await;

        assert!(matches!(rx.recv().await, Some(ServerMessage::Pong(_))));
    }

    #[tokio::test]
    async fn malformed_text_replies_with_error() {
        let (state, _) = test_state();
        let (id, mut rx) = state.connections.register();

        handle_client_text(&state, &id, "not json").await;

        match rx.recv().await {
            Some(ServerMessage::Error(err)) => assert_eq!(err.code, "INVALID_MESSAGE"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn sync_item_text_reaches_other_authorized_connection() {
        let (state, registry) = test_state();
        let (sender_id, mut sender_rx) = state.connections.register();
        let (peer_id, mut peer_rx) = state.connections.register();
        for id in [sender_id, peer_id] {
            let token = registry.issue_token().await;
            state.hub.identify(&id, &token).await;
        }

        let text = json!({"type": "sync_item", "identifier": "Employee", "args": {"id": 42}}).to_string();
        handle_client_text(&state, &sender_id, &text).await;

        match peer_rx.recv().await {
            Some(ServerMessage::Event(event)) => {
                assert_eq!(event.event, "SyncReceived");
                assert_eq!(event.payload.args, json!({"id": 42}));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(sender_rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn disconnect_waits_for_identify_in_flight() {
        let registry = Arc::new(SlowAuthorizer {
            inner: InMemoryConnectionAuthorizer::new(),
            delay: Duration::from_millis(200),
        });
        let connections = Arc::new(ConnectionManager::default());
        let hub = SyncHub::new(registry.clone(), connections.clone());
        let state = WebSocketState::new(hub, connections);
        let (id, _rx) = state.connections.register();
        let token = registry.issue_token().await;

        let text = json!({"type": "identify", "token": token.as_str()}).to_string();
        let recv_state = state.clone();
        let recv_task = tokio::spawn(async move {
            handle_client_text(&recv_state, &id, &text).await;
        });
        // Outbound side closes while identify is still binding.
        let send_task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        });

        join_socket_tasks(send_task, recv_task).await;
        state.hub.on_disconnect(&id).await;
        state.connections.unregister(&id);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(registry.authorized_connection_ids().await.is_empty());
        assert_eq!(state.connections.connection_count(), 0);
    }

    #[tokio::test]
    async fn join_socket_tasks_stops_the_other_half() {
        let send_task = tokio::spawn(async {});
        let recv_task = tokio::spawn(std::future::pending::<()>());
        let recv_abort = recv_task.abort_handle();

        join_socket_tasks(send_task, recv_task).await;

        assert!(recv_abort.is_finished());
    }
}
