//! Item change notification payload.

use serde::{Deserialize, Serialize};

/// Event name used when pushing change notifications to clients.
pub const SYNC_RECEIVED_EVENT: &str = "SyncReceived";

/// An "item changed" notification relayed between clients.
///
/// `identifier` names the kind of item (e.g. `"Employee"`); `args` is an
/// opaque structured payload the relay never inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub identifier: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

impl SyncPayload {
    pub fn new(identifier: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            identifier: identifier.into(),
            args,
        }
    }
}
