use callgate_core::protocol::InboundEvent;

use crate::relay::RelayCtx;
use crate::services::{Outcome, SignalRelay, VerdictRelay};

/// Routes each inbound event kind to the handler that owns it.
#[derive(Default)]
pub struct Dispatcher {
    signal: SignalRelay,
    verdict: VerdictRelay,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            signal: SignalRelay::new(),
            verdict: VerdictRelay::new(),
        }
    }

    /// Handle one event to completion. Only `offer` leaves work behind (its
    /// delayed send).
    pub fn dispatch(&self, ctx: &RelayCtx, ev: InboundEvent) -> Outcome {
        let event = ev.name();
        let outcome = match ev {
            InboundEvent::RegisterUser(req) => self.signal.register(ctx, req),
            InboundEvent::Call(req) => self.signal.call(ctx, req),
            InboundEvent::Offer(req) => self.signal.offer(ctx, req),
            InboundEvent::Answer(req) => self.signal.answer(ctx, req),
            InboundEvent::Ice(req) => self.signal.ice(ctx, req),
            InboundEvent::Hangup(req) => self.signal.hangup(ctx, req),
            InboundEvent::DeepfakeVerdict(req) => self.verdict.relay(ctx, req),
        };
        ctx.core()
            .metrics()
            .events
            .inc(&[("event", event), ("outcome", outcome.as_str())]);
        outcome
    }
}
