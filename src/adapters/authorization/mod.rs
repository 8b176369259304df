//! Connection authorization adapters.
//!
//! - [`in_memory`] - Process-local registry backed by concurrent maps

pub mod in_memory;

pub use in_memory::InMemoryConnectionAuthorizer;
