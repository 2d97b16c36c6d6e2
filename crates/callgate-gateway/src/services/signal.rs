use tokio::time::Duration;

use callgate_core::protocol::inbound::{
    AnswerRequest, CallRequest, HangupRequest, IceRequest, OfferRequest, RegisterUser,
};
use callgate_core::protocol::OutboundEvent;

use super::Outcome;
use crate::relay::RelayCtx;

/// Offers reach the callee this long after they arrive. Answers and ICE
/// candidates are not delayed, so an offer can land after a later answer.
pub const OFFER_RELAY_DELAY: Duration = Duration::from_millis(300);

/// Call setup and SDP/ICE routing.
///
/// `call` and `hangup` look the peer up by phone number; `offer`, `answer`
/// and `ice` take the raw connection id the caller got from `call-ack`.
#[derive(Default)]
pub struct SignalRelay;

impl SignalRelay {
    pub fn new() -> Self {
        Self
    }

    pub fn register(&self, ctx: &RelayCtx, req: RegisterUser) -> Outcome {
        if req.phone_number.is_empty() {
            tracing::warn!(conn = %ctx.conn_id(), "register-user without phone number");
            return Outcome::Dropped("empty_stable_id");
        }
        let displaced = ctx.core().directory.register(&req.phone_number, ctx.conn_id());
        match displaced {
            Some(prev) => tracing::info!(
                phone = %req.phone_number, conn = %ctx.conn_id(), displaced = %prev,
                "registered, previous binding replaced"
            ),
            None => tracing::info!(phone = %req.phone_number, conn = %ctx.conn_id(), "registered"),
        }
        Outcome::Registered
    }

    pub fn call(&self, ctx: &RelayCtx, req: CallRequest) -> Outcome {
        let caller = ctx.conn_id();
        let Some(target) = ctx.core().directory.resolve(&req.to) else {
            tracing::warn!(to = %req.to, from = ?req.from, conn = %caller, "call target not registered");
            return Outcome::Dropped("unregistered");
        };

        ctx.core().emit(
            &target,
            &OutboundEvent::Call {
                from: caller.to_string(),
                number: req.number,
                name: req.name,
            },
        );
        tracing::info!(to = %req.to, target = %target, from = ?req.from, conn = %caller, "call relayed");

        ctx.reply(&OutboundEvent::CallAck {
            to_socket_id: target.clone(),
        });
        tracing::info!(conn = %caller, to_socket_id = %target, "call-ack sent");
        Outcome::Delivered
    }

    /// Fire-and-forget: the delayed send cannot be cancelled and is a no-op if
    /// the target is gone by the time it runs.
    pub fn offer(&self, ctx: &RelayCtx, req: OfferRequest) -> Outcome {
        let from = ctx.conn_id().to_string();
        if req.to.is_empty() {
            tracing::warn!(%from, "offer without target connection");
            return Outcome::Dropped("empty_target");
        }
        tracing::info!(%from, to = %req.to, "offer scheduled");

        let core = ctx.core_arc();
        let OfferRequest { to, offer } = req;
        tokio::spawn(async move {
            tokio::time::sleep(OFFER_RELAY_DELAY).await;
            let ev = OutboundEvent::Offer {
                offer,
                from: from.clone(),
            };
            if core.emit(&to, &ev) {
                tracing::info!(%from, %to, "offer relayed");
            } else {
                tracing::warn!(%from, %to, "offer target gone before delivery");
            }
        });
        Outcome::Scheduled
    }

    pub fn answer(&self, ctx: &RelayCtx, req: AnswerRequest) -> Outcome {
        let from = ctx.conn_id().to_string();
        if req.to.is_empty() {
            tracing::warn!(%from, "answer without target connection");
            return Outcome::Dropped("empty_target");
        }
        let to = req.to;
        let ev = OutboundEvent::Answer {
            answer: req.answer,
            from: from.clone(),
        };
        forward(ctx, &from, &to, &ev)
    }

    pub fn ice(&self, ctx: &RelayCtx, req: IceRequest) -> Outcome {
        let from = ctx.conn_id().to_string();
        if req.to.is_empty() {
            tracing::warn!(%from, "ice without target connection");
            return Outcome::Dropped("empty_target");
        }
        let to = req.to;
        let ev = OutboundEvent::Ice {
            candidate: req.candidate,
            from: from.clone(),
        };
        forward(ctx, &from, &to, &ev)
    }

    /// Addressed by phone number, unlike offer/answer/ice. A callee that
    /// re-registered under another number mid-call will not get it.
    pub fn hangup(&self, ctx: &RelayCtx, req: HangupRequest) -> Outcome {
        let Some(target) = ctx.core().directory.resolve(&req.to) else {
            tracing::warn!(to = %req.to, from = ?req.from, conn = %ctx.conn_id(), "hangup target not registered");
            return Outcome::Dropped("unregistered");
        };
        ctx.core().emit(&target, &OutboundEvent::CallEnded);
        ctx.reply(&OutboundEvent::CallEnded);
        tracing::info!(to = %req.to, target = %target, from = ?req.from, conn = %ctx.conn_id(), "hangup relayed");
        Outcome::Delivered
    }
}

fn forward(ctx: &RelayCtx, from: &str, to: &str, ev: &OutboundEvent) -> Outcome {
    if ctx.core().emit(to, ev) {
        tracing::info!(%from, %to, event = ev.name(), "relayed");
        Outcome::Delivered
    } else {
        tracing::warn!(%from, %to, event = ev.name(), "target connection not live");
        Outcome::Dropped("target_not_connected")
    }
}
