//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the sync hub and the outside world. Adapters implement these ports.
//!
//! - `ConnectionAuthorizer` - Token issuance and connection authorization
//! - `ClientNotifier` - Fire-and-forget pushes to live connections

mod client_notifier;
mod connection_authorizer;

pub use client_notifier::ClientNotifier;
pub use connection_authorizer::ConnectionAuthorizer;
