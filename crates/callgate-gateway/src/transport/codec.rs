//! Decode-once codec for the transport layer.
//!
//! - Text frames => `InboundEvent`
//! - Binary frames are not part of the protocol and are refused
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use callgate_core::{
    error::{CallGateError, Result},
    protocol::{decode_text, InboundEvent},
};

#[derive(Debug)]
pub enum Inbound {
    Event(InboundEvent),
    /// tungstenite queues the pong itself.
    Ping,
    Pong,
    Close,
}

/// Frame length, checked before any parsing.
pub fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Event(decode_text(&s)?)),
        Message::Binary(_) => Err(CallGateError::BadRequest(
            "binary frames are not supported".into(),
        )),
        Message::Ping(_) => Ok(Inbound::Ping),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
