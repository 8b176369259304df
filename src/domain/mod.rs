//! Domain layer - identifiers, authorization records, and sync payloads.

pub mod foundation;
pub mod sync;
