//! callgate gateway
//!
//! - WebSocket endpoint: /v1/ws (presence, call signaling, deepfake verdicts)
//! - Upload proxy: /v1/files -> ML inference server
//! - Config: $CALLGATE_CONFIG (default `callgate.yaml`) + ML_* environment

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use callgate_core::error::{CallGateError, Result};
use callgate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "callgate-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("CALLGATE_CONFIG").unwrap_or_else(|_| "callgate.yaml".to_string());
    let cfg = config::load(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| CallGateError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "callgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CallGateError::Internal(format!("bind failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CallGateError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
