//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler, the pre-upgrade origin guard, and the codec
//! that decodes each frame once before it reaches the dispatcher.

pub mod codec;
pub mod handshake;
pub mod ws;
