//! SyncHub - Relays item change notifications between connected clients.
//!
//! Every inbound call is made on behalf of a caller connection. The hub
//! never pushes a notification back to the connection that raised it.
//!
//! ```text
//! Connected(unauthorized) ──identify(valid token)──▶ Connected(authorized)
//!          │                                                │
//!          └───────────────on_disconnect────────────────────┴──▶ Disconnected
//! ```

use std::sync::Arc;

use crate::domain::foundation::{ConnectionId, Token};
use crate::domain::sync::{SyncPayload, SYNC_RECEIVED_EVENT};
use crate::ports::{ClientNotifier, ConnectionAuthorizer};

/// Relay between the transport and the authorization registry.
///
/// With an authorizer configured, notifications go to authorized
/// connections only. Without one, every connected peer receives them.
/// Any connection may raise a notification, authorized or not.
#[derive(Clone)]
pub struct SyncHub {
    authorizer: Option<Arc<dyn ConnectionAuthorizer>>,
    notifier: Arc<dyn ClientNotifier>,
}

impl SyncHub {
    /// Hub that only relays to connections that identified with a token.
    pub fn new(authorizer: Arc<dyn ConnectionAuthorizer>, notifier: Arc<dyn ClientNotifier>) -> Self {
        Self {
            authorizer: Some(authorizer),
            notifier,
        }
    }

    /// Hub that relays to every connected peer.
    pub fn without_authorization(notifier: Arc<dyn ClientNotifier>) -> Self {
        Self {
            authorizer: None,
            notifier,
        }
    }

    /// The registry backing this hub, if any.
    pub fn authorizer(&self) -> Option<&Arc<dyn ConnectionAuthorizer>> {
        self.authorizer.as_ref()
    }

    /// Bind the caller to `token`.
    ///
    /// Never fails: an unknown token leaves the caller connected but
    /// unauthorized. Returns whether the caller is now authorized.
    pub async fn identify(&self, caller: &ConnectionId, token: &Token) -> bool {
        let Some(authorizer) = &self.authorizer else {
            tracing::debug!(connection_id = %caller, "Identify ignored, authorization disabled");
            return false;
        };

        match authorizer.authorize(token, caller).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(
                    connection_id = %caller,
                    code = %e.code(),
                    "Identify failed: {}",
                    e
                );
                false
            }
        }
    }

    /// Relay a change of `identifier` to every other recipient.
    ///
    /// Pushes are handed to the transport without waiting for delivery.
    /// Returns how many recipients the push was queued for.
    pub async fn sync_item(
        &self,
        caller: &ConnectionId,
        identifier: &str,
        args: serde_json::Value,
    ) -> usize {
        let recipients = match &self.authorizer {
            Some(authorizer) => authorizer.authorized_connection_ids().await,
            None => self.notifier.connected_clients(),
        };

        let payload = SyncPayload::new(identifier, args);
        let mut queued = 0;
        for recipient in recipients.iter().filter(|id| *id != caller) {
            if self
                .notifier
                .push_to(recipient, SYNC_RECEIVED_EVENT, payload.clone())
            {
                queued += 1;
            }
        }

        tracing::debug!(
            connection_id = %caller,
            identifier,
            recipients = queued,
            "Relayed item change"
        );
        queued
    }

    /// Forget the caller's authorization as it disconnects.
    pub async fn on_disconnect(&self, caller: &ConnectionId) {
        if let Some(authorizer) = &self.authorizer {
            authorizer.revoke(caller).await;
        }
        tracing::debug!(connection_id = %caller, "Connection left sync hub");
    }
}
