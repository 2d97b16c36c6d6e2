//! Shared error type across callgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Payload too large.
    PayloadTooLarge,
    /// Refused by connection policy (origin).
    NotAllowed,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Upstream answered with a non-2xx status.
    Upstream,
    /// Upstream could not be reached (timeout, refused).
    UpstreamUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CallGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CallGateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("upstream error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CallGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CallGateError::BadRequest(_) => ClientCode::BadRequest,
            CallGateError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            CallGateError::NotAllowed(_) => ClientCode::NotAllowed,
            CallGateError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            CallGateError::Upstream { .. } => ClientCode::Upstream,
            CallGateError::UpstreamUnavailable(_) => ClientCode::UpstreamUnavailable,
            CallGateError::Internal(_) => ClientCode::Internal,
        }
    }
}
