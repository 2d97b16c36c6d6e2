use std::time::{SystemTime, UNIX_EPOCH};

use callgate_core::protocol::inbound::VerdictRequest;
use callgate_core::protocol::OutboundEvent;

use super::Outcome;
use crate::relay::RelayCtx;

/// Forwards classifier verdicts between call peers.
///
/// Order of checks: target present, probabilities finite (then clamped),
/// sender timestamp numeric if given, target live, sender throttle. Every
/// failure is a silent drop.
#[derive(Default)]
pub struct VerdictRelay;

impl VerdictRelay {
    pub fn new() -> Self {
        Self
    }

    pub fn relay(&self, ctx: &RelayCtx, req: VerdictRequest) -> Outcome {
        let from = ctx.conn_id();
        let verdict = match req.validate() {
            Ok(v) => v,
            Err(reason) => {
                tracing::debug!(%from, reason = reason.as_str(), "verdict rejected");
                return Outcome::Dropped(reason.as_str());
            }
        };

        let core = ctx.core();
        if !core.sessions.contains(&verdict.to) {
            tracing::debug!(%from, to = %verdict.to, "verdict target not connected");
            return Outcome::Dropped("target_not_connected");
        }

        let ts = verdict.ts.unwrap_or_else(now_millis);
        if !core.throttle.admit(from, ts) {
            return Outcome::Dropped("throttled");
        }

        tracing::debug!(
            %from,
            to = %verdict.to,
            call_id = verdict.call_id.as_deref().unwrap_or("-"),
            p_fake = verdict.p_fake,
            p_real = verdict.p_real,
            "verdict relayed"
        );
        let ev = OutboundEvent::DeepfakeVerdict {
            from: from.to_string(),
            call_id: verdict.call_id,
            p_fake: verdict.p_fake,
            p_real: verdict.p_real,
            ts,
        };
        if core.emit(&verdict.to, &ev) {
            Outcome::Delivered
        } else {
            Outcome::Dropped("target_not_connected")
        }
    }
}

/// Wall clock in milliseconds since the UNIX epoch.
fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
