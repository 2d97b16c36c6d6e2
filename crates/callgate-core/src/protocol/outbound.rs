//! Relay -> client events.

use serde::Serialize;
use serde_json::Value;

use crate::error::{CallGateError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    /// Sent once per session so the client knows its own connection id.
    Connected {
        #[serde(rename = "socketId")]
        socket_id: String,
    },
    Call {
        /// Caller connection id.
        from: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    CallAck {
        #[serde(rename = "toSocketId")]
        to_socket_id: String,
    },
    Offer { offer: Value, from: String },
    Answer { answer: Value, from: String },
    Ice { candidate: Value, from: String },
    CallEnded,
    DeepfakeVerdict {
        from: String,
        #[serde(rename = "callId", skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
        #[serde(rename = "pFake")]
        p_fake: f64,
        #[serde(rename = "pReal")]
        p_real: f64,
        ts: f64,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::Connected { .. } => "connected",
            OutboundEvent::Call { .. } => "call",
            OutboundEvent::CallAck { .. } => "call-ack",
            OutboundEvent::Offer { .. } => "offer",
            OutboundEvent::Answer { .. } => "answer",
            OutboundEvent::Ice { .. } => "ice",
            OutboundEvent::CallEnded => "call-ended",
            OutboundEvent::DeepfakeVerdict { .. } => "deepfake-verdict",
        }
    }

    /// Serialize to the text frame body.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CallGateError::Internal(format!("json encode failed: {e}")))
    }
}
