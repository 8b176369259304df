//! Record binding a live connection to the token it identified with.

use serde::Serialize;

use crate::domain::foundation::{ConnectionId, Timestamp, Token};

/// A live connection that successfully presented an issued token.
///
/// Each connection id maps to at most one record at a time. Identifying
/// again replaces the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedConnection {
    pub connection_id: ConnectionId,
    #[serde(skip_serializing)]
    pub token: Token,
    /// User the token was issued for, if the login flow supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub authorized_at: Timestamp,
}

impl AuthorizedConnection {
    /// Binds a connection to a token at the current time.
    pub fn new(connection_id: ConnectionId, token: Token, user: Option<String>) -> Self {
        Self {
            connection_id,
            token,
            user,
            authorized_at: Timestamp::now(),
        }
    }
}
