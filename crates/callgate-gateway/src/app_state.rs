//! Shared application state for the callgate gateway.
//!
//! Built once at startup; every handler gets a cheap clone. Startup errors are
//! returned, not panicked.

use std::sync::Arc;

use callgate_core::error::Result;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::inference::InferenceClient;
use crate::obs::metrics::GatewayMetrics;
use crate::relay::RelayCore;
use crate::transport::handshake::OriginPolicy;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    relay: Arc<RelayCore>,
    dispatcher: Arc<Dispatcher>,
    inference: Arc<InferenceClient>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    origins: OriginPolicy,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(GatewayMetrics::default());
        let relay = Arc::new(RelayCore::new(Arc::clone(&metrics)));
        let inference = InferenceClient::new(&cfg.inference)?;
        let origins = OriginPolicy::from_config(&cfg.gateway.allowed_origins);

        tracing::info!(
            predict_url = %inference.predict_url(),
            timeout_ms = cfg.inference.timeout_ms,
            "inference proxy configured"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, origins }),
            relay,
            dispatcher: Arc::new(Dispatcher::new()),
            inference: Arc::new(inference),
            metrics,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.inner.origins
    }

    pub fn relay(&self) -> Arc<RelayCore> {
        Arc::clone(&self.relay)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn inference(&self) -> &InferenceClient {
        &self.inference
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }
}
