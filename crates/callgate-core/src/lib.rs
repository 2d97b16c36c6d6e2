//! callgate core: transport-agnostic wire events, verdict validation, and errors.
//!
//! This crate defines the event contracts exchanged over the signaling socket
//! and the error surface shared by the gateway. It carries no transport or
//! runtime dependencies so the relay rules can be exercised without a socket.
//!
//! # Panic policy
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed client input surfaces as `CallGateError`/`Result`, never a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{CallGateError, Result};
