//! In-memory connection authorization registry.
//!
//! Holds two maps:
//!
//! ```text
//! tokens:       token         → { user }
//! connections:  connection_id → AuthorizedConnection
//! ```
//!
//! Both are sharded `DashMap`s, so unrelated connections never contend on a
//! single lock. State lives only as long as the process: tokens never expire
//! and the token map only grows.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::foundation::{AuthorizationError, ConnectionId, Token};
use crate::domain::sync::AuthorizedConnection;
use crate::ports::ConnectionAuthorizer;

/// Issued token. Connection bindings are kept only in the connection map.
#[derive(Debug, Clone, Default)]
struct TokenRecord {
    user: Option<String>,
}

/// Process-local token registry.
///
/// Construct one per server and share it behind an `Arc`; tests create as
/// many isolated instances as they need.
#[derive(Debug, Default)]
pub struct InMemoryConnectionAuthorizer {
    tokens: DashMap<Token, TokenRecord>,
    connections: DashMap<ConnectionId, AuthorizedConnection>,
}

impl InMemoryConnectionAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens ever issued.
    pub fn issued_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of connections currently authorized.
    pub fn authorized_count(&self) -> usize {
        self.connections.len()
    }

    fn record_token(&self, user: Option<String>) -> Token {
        let token = Token::generate();
        self.tokens.insert(token.clone(), TokenRecord { user });
        token
    }
}

#[async_trait]
impl ConnectionAuthorizer for InMemoryConnectionAuthorizer {
    async fn issue_token(&self) -> Token {
        let token = self.record_token(None);
        tracing::debug!(issued = self.tokens.len(), "Issued sync token");
        token
    }

    async fn issue_token_for(&self, user: &str) -> Token {
        let token = self.record_token(Some(user.to_string()));
        tracing::debug!(user, "Issued sync token for user");
        token
    }

    async fn authorize(
        &self,
        token: &Token,
        connection_id: &ConnectionId,
    ) -> Result<AuthorizedConnection, AuthorizationError> {
        // Release the token shard before touching the connection map.
        let user = self
            .tokens
            .get(token)
            .ok_or(AuthorizationError::InvalidToken)?
            .user
            .clone();

        let authorized = AuthorizedConnection::new(*connection_id, token.clone(), user);
        self.connections.insert(*connection_id, authorized.clone());

        tracing::info!(
            connection_id = %connection_id,
            user = authorized.user.as_deref().unwrap_or("-"),
            "Connection authorized"
        );
        Ok(authorized)
    }

    async fn revoke(&self, connection_id: &ConnectionId) {
        if self.connections.remove(connection_id).is_some() {
            tracing::info!(connection_id = %connection_id, "Connection authorization revoked");
        }
    }

    async fn authorized_connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }

    async fn authorized_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<AuthorizedConnection> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
    }
}
