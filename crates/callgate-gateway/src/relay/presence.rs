use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Presence directory: stable id (phone number) <-> connection id.
///
/// Both directions live behind one lock so a registration is never observed
/// half-applied by another connection's event.
#[derive(Default)]
pub struct PresenceDirectory {
    inner: Mutex<Bindings>,
}

#[derive(Default)]
struct Bindings {
    by_stable: HashMap<String, String>,
    by_conn: HashMap<String, String>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Bindings> {
        // Maps hold plain strings; a panic mid-update cannot leave them torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `stable_id` to `conn_id`, replacing any earlier binding.
    ///
    /// Returns the displaced connection id, if any. The displaced connection is
    /// not notified and stays connected.
    pub fn register(&self, stable_id: &str, conn_id: &str) -> Option<String> {
        let mut b = self.lock();
        let displaced = b
            .by_stable
            .insert(stable_id.to_string(), conn_id.to_string())
            .filter(|prev| prev != conn_id);
        b.by_conn.insert(conn_id.to_string(), stable_id.to_string());
        displaced
    }

    pub fn resolve(&self, stable_id: &str) -> Option<String> {
        self.lock().by_stable.get(stable_id).cloned()
    }

    pub fn reverse(&self, conn_id: &str) -> Option<String> {
        self.lock().by_conn.get(conn_id).cloned()
    }

    /// Drop both directions of the binding recorded for `conn_id`. Returns
    /// the stable id it held.
    ///
    /// The forward entry goes even if the stable id was re-registered by a
    /// newer connection since: that successor becomes unreachable until it
    /// registers again.
    pub fn unbind(&self, conn_id: &str) -> Option<String> {
        let mut b = self.lock();
        let stable_id = b.by_conn.remove(conn_id)?;
        b.by_stable.remove(&stable_id);
        Some(stable_id)
    }
}
