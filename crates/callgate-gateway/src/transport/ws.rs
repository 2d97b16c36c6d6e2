//! WebSocket handler.
//!
//! Responsibilities:
//! - Origin check, then upgrade HTTP -> WS with the configured message limit
//! - Connection lifecycle: connect/disconnect bookkeeping in `RelayCore`
//! - Keep-alive: server ping every `ping_interval_ms`; no inbound traffic for
//!   `ping_interval_ms + ping_timeout_ms` ends the session
//! - Decode-once then hand each event to the dispatcher

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::Instrument;

use callgate_core::protocol::OutboundEvent;

use crate::app_state::AppState;
use crate::relay::{RelayCtx, OUTBOUND_QUEUE};
use crate::transport::codec::{decode, frame_len, Inbound};

/// Transport-level message limit, as a multiple of `max_payload_bytes`.
const TRANSPORT_CAP_FACTOR: usize = 4;

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    if let Err(e) = app.origin_policy().check(&headers) {
        app.metrics().origin_rejections.inc(&[]);
        tracing::warn!(error = %e, "handshake refused");
        return (StatusCode::FORBIDDEN, e.to_string()).into_response();
    }

    // Hard cap at the protocol layer. Anything between `max_payload_bytes`
    // and the cap reaches the session loop and gets a 1009 close.
    let cap = app.cfg().gateway.max_payload_bytes.saturating_mul(TRANSPORT_CAP_FACTOR);
    ws.max_message_size(cap)
        .max_frame_size(cap)
        .on_upgrade(move |socket| run_session(app, socket))
}

async fn run_session(app: AppState, socket: WebSocket) {
    let core = app.relay();
    let (out_tx, out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);
    let conn_id = core.connect(out_tx.clone());

    let span = tracing::info_span!("session", conn = %conn_id);
    session_loop(&app, &conn_id, out_tx, out_rx, socket)
        .instrument(span)
        .await;

    core.disconnect(&conn_id);
}

// --------------------
// Core session loop
// --------------------
async fn session_loop(
    app: &AppState,
    conn_id: &str,
    out_tx: mpsc::Sender<Message>,
    mut out_rx: mpsc::Receiver<Message>,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let dispatcher = app.dispatcher();
    let ctx = RelayCtx::new(conn_id, app.relay());

    ctx.reply(&OutboundEvent::Connected {
        socket_id: conn_id.to_string(),
    });

    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let dead_after = ping_every + Duration::from_millis(gw.ping_timeout_ms);
    let max_payload = gw.max_payload_bytes;

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                if ws_tx.send(m).await.is_err() {
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = %e, "socket read failed");
                        break;
                    }
                };
                last_activity = Instant::now();

                // cheap-first: size before decode
                let len = frame_len(&msg);
                if len > max_payload {
                    app.metrics().decode_errors.inc(&[("reason", "too_large")]);
                    tracing::warn!(len, max_payload, "frame too large, closing");
                    let _ = ws_tx
                        .send(Message::Close(Some(CloseFrame {
                            code: close_code::SIZE,
                            reason: "payload too large".into(),
                        })))
                        .await;
                    break;
                }

                match decode(msg) {
                    Ok(Inbound::Event(ev)) => {
                        dispatcher.dispatch(&ctx, ev);
                    }
                    Ok(Inbound::Ping) | Ok(Inbound::Pong) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        app.metrics().decode_errors.inc(&[("reason", "invalid_event")]);
                        tracing::debug!(error = %e, "frame ignored");
                    }
                }
            }

            // keep-alive ping
            _ = ping_tick.tick() => {
                let _ = out_tx.try_send(Message::Ping(Vec::new()));
            }

            // liveness
            _ = tokio::time::sleep_until(last_activity + dead_after) => {
                tracing::info!("keep-alive timeout");
                break;
            }
        }
    }

    let _ = ws_tx.close().await;
}
