//! Event handlers.
//!
//! - `signal`: presence registration and call/offer/answer/ice/hangup routing.
//! - `verdict`: validated, throttled forwarding of classifier verdicts.
//!
//! Handlers never report failure to the sender; the returned `Outcome` only
//! feeds logs and metrics.

pub mod signal;
pub mod verdict;

pub use signal::{SignalRelay, OFFER_RELAY_DELAY};
pub use verdict::VerdictRelay;

/// What a handler did with one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Presence directory updated; nothing emitted.
    Registered,
    /// Emitted immediately.
    Delivered,
    /// Emission deferred to a timer task.
    Scheduled,
    /// Dropped for the given reason.
    Dropped(&'static str),
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Registered => "registered",
            Outcome::Delivered => "delivered",
            Outcome::Scheduled => "scheduled",
            Outcome::Dropped(_) => "dropped",
        }
    }
}
