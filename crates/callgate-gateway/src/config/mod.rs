//! Gateway config loader (strict parsing).
//!
//! YAML file first (missing file means defaults), then the inference proxy
//! settings are overridden from `ML_URL`, `ML_PREDICT_PATH`, `ML_TIMEOUT_MS`.

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use callgate_core::error::{CallGateError, Result};

pub use schema::{GatewayConfig, GatewaySection, InferenceSection};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CallGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| CallGateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, apply process environment overrides, validate.
pub fn load(path: &str) -> Result<GatewayConfig> {
    let mut cfg = match fs::metadata(path) {
        Ok(_) => load_from_file(path)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            GatewayConfig::default()
        }
        Err(e) => return Err(CallGateError::Internal(format!("stat config failed: {e}"))),
    };
    apply_env(&mut cfg, |k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Override inference settings from an environment lookup.
pub fn apply_env(cfg: &mut GatewayConfig, env: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(url) = env("ML_URL") {
        cfg.inference.url = url;
    }
    if let Some(path) = env("ML_PREDICT_PATH") {
        cfg.inference.predict_path = path;
    }
    if let Some(ms) = env("ML_TIMEOUT_MS") {
        cfg.inference.timeout_ms = ms
            .trim()
            .parse()
            .map_err(|e| CallGateError::BadRequest(format!("ML_TIMEOUT_MS invalid: {e}")))?;
    }
    Ok(())
}
