//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the sync hub.

mod errors;
mod ids;
mod timestamp;

pub use errors::{AuthorizationError, ErrorCode};
pub use ids::{ConnectionId, Token};
pub use timestamp::Timestamp;
