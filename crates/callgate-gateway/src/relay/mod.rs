//! Relay state shared by every connection.
//!
//! `RelayCore` owns the presence directory, the verdict throttle table and the
//! live session registry. It is built once at startup, shared via `Arc`, and
//! dropped at shutdown; nothing here survives a restart.

mod lifecycle;
mod presence;
mod sessions;
mod throttle;

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc::error::TrySendError;

use callgate_core::protocol::OutboundEvent;

use crate::obs::metrics::GatewayMetrics;

pub use presence::PresenceDirectory;
pub use sessions::{Connection, SessionRegistry};
pub use throttle::ThrottleTable;

/// Capacity of each session's outbound queue.
pub const OUTBOUND_QUEUE: usize = 1024;

pub struct RelayCore {
    pub sessions: SessionRegistry,
    pub directory: PresenceDirectory,
    pub throttle: ThrottleTable,
    metrics: Arc<GatewayMetrics>,
}

impl RelayCore {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            directory: PresenceDirectory::new(),
            throttle: ThrottleTable::new(),
            metrics,
        }
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Queue `ev` for `conn_id`. Returns false when nothing was queued.
    ///
    /// A missing target or a full/closed queue is logged and swallowed; the
    /// sender is never told.
    pub fn emit(&self, conn_id: &str, ev: &OutboundEvent) -> bool {
        let Some(conn) = self.sessions.get(conn_id) else {
            tracing::debug!(to = %conn_id, event = ev.name(), "emit target not connected");
            return false;
        };
        let text = match ev.to_json() {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, event = ev.name(), "outbound encode failed");
                return false;
            }
        };
        match conn.tx.try_send(Message::Text(text)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(to = %conn_id, event = ev.name(), "outbound queue full, dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(to = %conn_id, event = ev.name(), "outbound queue closed");
                false
            }
        }
    }
}

/// Per-event context: who sent it, plus the shared core.
#[derive(Clone)]
pub struct RelayCtx {
    conn_id: Arc<str>,
    core: Arc<RelayCore>,
}

impl RelayCtx {
    pub fn new(conn_id: impl Into<Arc<str>>, core: Arc<RelayCore>) -> Self {
        Self {
            conn_id: conn_id.into(),
            core,
        }
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn core(&self) -> &RelayCore {
        &self.core
    }

    pub fn core_arc(&self) -> Arc<RelayCore> {
        Arc::clone(&self.core)
    }

    /// Emit back to the connection that sent the current event.
    pub fn reply(&self, ev: &OutboundEvent) -> bool {
        self.core.emit(&self.conn_id, ev)
    }
}
