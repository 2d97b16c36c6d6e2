//! Axum router wiring.
//!
//! - `/v1/ws`    : WebSocket upgrade (signaling + verdicts)
//! - `/v1/files` : upload proxy to the inference server
//! - `/healthz`, `/metrics` : ops

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, inference, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.cfg().inference.max_upload_bytes;
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route(
            "/v1/files",
            post(inference::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
