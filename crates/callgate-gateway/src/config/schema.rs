use serde::Deserialize;
use callgate_core::error::{CallGateError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub inference: InferenceSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            inference: InferenceSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CallGateError::UnsupportedVersion);
        }
        self.gateway.validate()?;
        self.inference.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Server ping cadence.
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    /// Grace after a missed ping before the session is declared dead.
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,

    /// Largest inbound WebSocket message; bigger ones close the session.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// Accepted `Origin` header values; `"*"` accepts any.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            max_payload_bytes: default_max_payload_bytes(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=300_000).contains(&self.ping_interval_ms) {
            return Err(CallGateError::BadRequest(
                "gateway.ping_interval_ms must be between 1000 and 300000".into(),
            ));
        }
        if !(1000..=300_000).contains(&self.ping_timeout_ms) {
            return Err(CallGateError::BadRequest(
                "gateway.ping_timeout_ms must be between 1000 and 300000".into(),
            ));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_payload_bytes) {
            return Err(CallGateError::BadRequest(
                "gateway.max_payload_bytes must be between 1024 and 16777216".into(),
            ));
        }
        if self.allowed_origins.is_empty() {
            return Err(CallGateError::BadRequest(
                "gateway.allowed_origins must not be empty (use \"*\" to accept any)".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_ping_interval_ms() -> u64 {
    25000
}
fn default_ping_timeout_ms() -> u64 {
    20000
}
fn default_max_payload_bytes() -> usize {
    1_000_000
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceSection {
    /// ML server base URL; a trailing `/` is ignored.
    #[serde(default = "default_ml_url")]
    pub url: String,

    #[serde(default = "default_predict_path")]
    pub predict_path: String,

    #[serde(default = "default_ml_timeout_ms")]
    pub timeout_ms: u64,

    /// Body limit for `POST /v1/files`.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for InferenceSection {
    fn default() -> Self {
        Self {
            url: default_ml_url(),
            predict_path: default_predict_path(),
            timeout_ms: default_ml_timeout_ms(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl InferenceSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(CallGateError::BadRequest(
                "inference.url must start with http:// or https://".into(),
            ));
        }
        if !self.predict_path.starts_with('/') {
            return Err(CallGateError::BadRequest(
                "inference.predict_path must start with '/'".into(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(CallGateError::BadRequest(
                "inference.timeout_ms must be greater than 0".into(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(CallGateError::BadRequest(
                "inference.max_upload_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// `{url}{predict_path}` with the base URL's trailing slash trimmed.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.predict_path)
    }
}

fn default_ml_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_predict_path() -> String {
    "/predict".into()
}
fn default_ml_timeout_ms() -> u64 {
    60000
}
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
