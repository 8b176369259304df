//! Application layer - Orchestrates the registry and the transport.
//!
//! [`SyncHub`] is the relay invoked by the transport on behalf of each
//! connected client.

mod sync_hub;

pub use sync_hub::SyncHub;
