//! Coddee Sync - Real-time item change relay
//!
//! Clients connect over WebSocket, identify with a token issued by the login
//! flow, and announce item changes. The hub relays each change to every
//! other authorized connection.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
