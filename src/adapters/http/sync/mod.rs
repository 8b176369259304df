//! Sync hub HTTP endpoints: token issuance and health.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{SyncAppState, SyncApiError, ISSUER_KEY_HEADER};
pub use routes::sync_router;
