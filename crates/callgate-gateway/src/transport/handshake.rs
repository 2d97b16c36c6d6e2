//! Origin guard (pre-upgrade).
//!
//! Browsers always send `Origin` on a WebSocket handshake; non-browser clients
//! usually omit it and are let through.

use axum::http::{header::ORIGIN, HeaderMap};

use callgate_core::error::{CallGateError, Result};

#[derive(Debug, Clone)]
pub enum OriginPolicy {
    Any,
    List(Vec<String>),
}

impl OriginPolicy {
    pub fn from_config(allowed: &[String]) -> Self {
        if allowed.iter().any(|o| o == "*") {
            OriginPolicy::Any
        } else {
            OriginPolicy::List(
                allowed
                    .iter()
                    .map(|o| o.trim_end_matches('/').to_ascii_lowercase())
                    .collect(),
            )
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            OriginPolicy::Any => true,
            OriginPolicy::List(list) => {
                let origin = origin.trim_end_matches('/').to_ascii_lowercase();
                list.iter().any(|o| *o == origin)
            }
        }
    }

    /// Check the handshake headers. Missing `Origin` passes.
    pub fn check(&self, headers: &HeaderMap) -> Result<()> {
        let Some(raw) = headers.get(ORIGIN) else {
            return Ok(());
        };
        let origin = raw
            .to_str()
            .map_err(|_| CallGateError::NotAllowed("origin header is not ascii".into()))?;
        if self.allows(origin) {
            Ok(())
        } else {
            Err(CallGateError::NotAllowed(format!("origin {origin} not allowed")))
        }
    }
}
