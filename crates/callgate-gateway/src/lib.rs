//! callgate gateway library entry.
//!
//! Wires the transport, dispatcher, relay state, inference proxy and ops
//! endpoints into one axum application. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod inference;
pub mod obs;
pub mod ops;
pub mod relay;
pub mod router;
pub mod services;
pub mod transport;
