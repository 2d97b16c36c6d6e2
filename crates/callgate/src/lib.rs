//! Top-level facade crate for callgate.
//!
//! Re-exports the protocol/error core and the gateway library so users can
//! depend on a single crate.

pub mod core {
    pub use callgate_core::*;
}

pub mod gateway {
    pub use callgate_gateway::*;
}
