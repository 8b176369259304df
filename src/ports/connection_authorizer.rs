//! ConnectionAuthorizer port - Token-based authorization of live connections.
//!
//! The login flow issues a token and hands it to the client out-of-band. The
//! client later presents that token over its sync connection, and the
//! authorizer binds the live connection id to the token. The relay asks the
//! authorizer which connections may receive change notifications.
//!
//! ## Use Case
//!
//! 1. User logs in; the login flow calls `issue_token`
//! 2. Client connects to the sync hub and sends `identify(token)`
//! 3. Hub calls `authorize(token, connection_id)`
//! 4. Another client syncs an item; hub calls `authorized_connection_ids`
//! 5. Client disconnects; hub calls `revoke(connection_id)`

use async_trait::async_trait;

use crate::domain::foundation::{AuthorizationError, ConnectionId, Token};
use crate::domain::sync::AuthorizedConnection;

/// Port for exchanging issued tokens for connection authorization.
///
/// Implementations must:
/// - Be safe under concurrent calls from many connections
/// - Leave state unchanged when `authorize` fails
/// - Treat `revoke` of an unknown connection as a no-op
///
/// # Example
///
/// ```ignore
/// let token = authorizer.issue_token().await;
/// // ... token travels to the client in the login response ...
/// authorizer.authorize(&token, &connection_id).await?;
/// let recipients = authorizer.authorized_connection_ids().await;
/// ```
#[async_trait]
pub trait ConnectionAuthorizer: Send + Sync {
    /// Issue a fresh token, recorded as pending until a connection binds it.
    async fn issue_token(&self) -> Token;

    /// Issue a fresh token for a known user.
    ///
    /// The user name is carried onto every connection that identifies with
    /// this token.
    async fn issue_token_for(&self, user: &str) -> Token;

    /// Bind a live connection to a previously issued token.
    ///
    /// Overwrites any existing record for `connection_id`. Tokens are not
    /// consumed and may be presented again.
    ///
    /// # Errors
    ///
    /// `AuthorizationError::InvalidToken` if `token` was never issued.
    async fn authorize(
        &self,
        token: &Token,
        connection_id: &ConnectionId,
    ) -> Result<AuthorizedConnection, AuthorizationError>;

    /// Forget any authorization held by `connection_id`.
    async fn revoke(&self, connection_id: &ConnectionId);

    /// Point-in-time copy of every authorized connection id.
    async fn authorized_connection_ids(&self) -> Vec<ConnectionId>;

    /// Look up the authorization record for a live connection.
    async fn authorized_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<AuthorizedConnection>;
}
