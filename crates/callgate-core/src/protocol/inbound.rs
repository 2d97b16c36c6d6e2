//! Client -> relay events.
//!
//! Addressing differs per event and is part of the contract:
//! - `call` and `hangup` address the peer by stable identifier (phone number).
//! - `offer`, `answer`, `ice` and `deepfake-verdict` address the peer by the
//!   raw connection id learned from `call-ack`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CallGateError, Result};

/// Inbound event, tagged by `event` with its payload under `data`.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundEvent {
    RegisterUser(RegisterUser),
    Call(CallRequest),
    Offer(OfferRequest),
    Answer(AnswerRequest),
    Ice(IceRequest),
    Hangup(HangupRequest),
    DeepfakeVerdict(VerdictRequest),
}

impl InboundEvent {
    /// Wire name of the event (used for logs and metrics labels).
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::RegisterUser(_) => "register-user",
            InboundEvent::Call(_) => "call",
            InboundEvent::Offer(_) => "offer",
            InboundEvent::Answer(_) => "answer",
            InboundEvent::Ice(_) => "ice",
            InboundEvent::Hangup(_) => "hangup",
            InboundEvent::DeepfakeVerdict(_) => "deepfake-verdict",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    /// Stable identifier. Not authenticated.
    #[serde(rename = "phoneNumber", alias = "stableId", default)]
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct CallRequest {
    /// Callee stable identifier.
    #[serde(default)]
    pub to: String,
    /// Caller stable identifier (informational only).
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OfferRequest {
    /// Raw connection id.
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub offer: Value,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Raw connection id.
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub answer: Value,
}

#[derive(Debug, Deserialize)]
pub struct IceRequest {
    /// Raw connection id.
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub candidate: Value,
}

#[derive(Debug, Deserialize)]
pub struct HangupRequest {
    /// Peer stable identifier, not a connection id.
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
}

/// Probabilities and `ts` stay raw JSON so a non-numeric value can be
/// rejected by the relay instead of failing the whole frame decode.
#[derive(Debug, Deserialize)]
pub struct VerdictRequest {
    /// Raw connection id.
    #[serde(default)]
    pub to: String,
    #[serde(rename = "callId", default)]
    pub call_id: Option<String>,
    #[serde(rename = "pFake", default)]
    pub p_fake: Value,
    #[serde(rename = "pReal", default)]
    pub p_real: Value,
    /// Sender clock, milliseconds. Absent and `null` both mean "use the
    /// relay's clock".
    #[serde(default)]
    pub ts: Value,
}

/// Decode one text frame into an inbound event.
pub fn decode_text(s: &str) -> Result<InboundEvent> {
    serde_json::from_str(s)
        .map_err(|e| CallGateError::BadRequest(format!("invalid event json: {e}")))
}
