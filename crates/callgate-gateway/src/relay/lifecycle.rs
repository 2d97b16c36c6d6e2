//! Connect/disconnect bookkeeping.

use tokio::sync::mpsc;
use uuid::Uuid;

use axum::extract::ws::Message;

use super::{Connection, RelayCore};

impl RelayCore {
    /// Register a new live session and hand back its connection id.
    /// No presence binding exists until the client sends `register-user`.
    pub fn connect(&self, tx: mpsc::Sender<Message>) -> String {
        let conn_id = Uuid::new_v4().to_string();
        self.sessions.insert(conn_id.clone(), Connection { tx });
        self.metrics.ws_connections_active.inc(&[]);
        tracing::info!(conn = %conn_id, "connected");
        conn_id
    }

    /// Tear down everything keyed by `conn_id`. Peers in a call with it are
    /// not notified.
    pub fn disconnect(&self, conn_id: &str) {
        if self.sessions.remove(conn_id).is_some() {
            self.metrics.ws_connections_active.dec(&[]);
        }
        self.throttle.remove(conn_id);
        match self.directory.unbind(conn_id) {
            Some(phone) => tracing::info!(conn = %conn_id, %phone, "disconnected, presence released"),
            None => tracing::info!(conn = %conn_id, "disconnected, never registered"),
        }
    }
}
