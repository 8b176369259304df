//! Sync domain - authorization records and change notifications.

mod authorized_connection;
mod payload;

pub use authorized_connection::AuthorizedConnection;
pub use payload::{SyncPayload, SYNC_RECEIVED_EVENT};
