//! Signaling socket protocol.
//!
//! Every text frame is one JSON object `{"event": <name>, "data": <payload>}`.
//! - `inbound`: events clients send to the relay.
//! - `outbound`: events the relay emits to a specific connection.
//! - `verdict`: probability validation and clamping for classifier verdicts.
//!
//! Decoding never panics: malformed frames are reported as `CallGateError`.

pub mod inbound;
pub mod outbound;
pub mod verdict;

pub use inbound::{decode_text, InboundEvent};
pub use outbound::OutboundEvent;
