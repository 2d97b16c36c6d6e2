use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use callgate_core::protocol::verdict::VERDICT_MIN_SPACING_MS;

/// Per-sender timestamp of the last accepted verdict.
///
/// Keeps the latest accepted only: anything closer than
/// `VERDICT_MIN_SPACING_MS` to it is dropped and never replayed.
#[derive(Default)]
pub struct ThrottleTable {
    last_accepted: DashMap<String, f64>,
}

impl ThrottleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or refuse a verdict stamped `ts` (ms) from `conn_id`.
    /// Refusal leaves the stored timestamp untouched.
    pub fn admit(&self, conn_id: &str, ts: f64) -> bool {
        match self.last_accepted.entry(conn_id.to_string()) {
            Entry::Occupied(mut e) => {
                if ts - *e.get() < VERDICT_MIN_SPACING_MS {
                    return false;
                }
                e.insert(ts);
                true
            }
            Entry::Vacant(e) => {
                e.insert(ts);
                true
            }
        }
    }

    pub fn last_accepted(&self, conn_id: &str) -> Option<f64> {
        self.last_accepted.get(conn_id).map(|r| *r.value())
    }

    pub fn remove(&self, conn_id: &str) {
        self.last_accepted.remove(conn_id);
    }
}
