//! Full session path: router, upgrade, session loop, disconnect bookkeeping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Duration, Instant};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use callgate_gateway::app_state::AppState;
use callgate_gateway::config::GatewayConfig;
use callgate_gateway::router::build_router;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start(cfg: GatewayConfig) -> (AppState, SocketAddr) {
    let state = AppState::new(cfg).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

/// Open a session and consume `connected`; returns the assigned connection id.
async fn dial(addr: SocketAddr) -> (Client, String) {
    let (mut ws, _) = connect_async(format!("ws://{addr}/v1/ws")).await.unwrap();
    let first = next_event(&mut ws).await;
    assert_eq!(first["event"], "connected", "first event was {first}");
    let id = first["data"]["socketId"].as_str().unwrap().to_string();
    (ws, id)
}

/// Next text event, skipping keep-alive control frames.
async fn next_event(ws: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket ended")
            .unwrap();
        match msg {
            Message::Text(s) => return serde_json::from_str(&s).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn send(ws: &mut Client, ev: Value) {
    ws.send(Message::Text(ev.to_string())).await.unwrap();
}

async fn eventually(within: Duration, what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + within;
    while !cond() {
        assert!(Instant::now() < deadline, "never reached: {what}");
        sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn connected_is_sent_first_and_names_the_session() {
    let (state, addr) = start(GatewayConfig::default()).await;
    let (_ws, id) = dial(addr).await;

    assert!(!id.is_empty());
    assert!(state.relay().sessions.contains(&id));
    assert_eq!(state.metrics().ws_connections_active.get(&[]), 1);
}

#[tokio::test]
async fn bad_frames_are_ignored_and_session_continues() {
    let (state, addr) = start(GatewayConfig::default()).await;
    let (mut ws, id) = dial(addr).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    send(&mut ws, json!({ "event": "dance", "data": {} })).await;
    ws.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
    send(&mut ws, json!({ "event": "register-user", "data": { "phoneNumber": "01011112222" } })).await;

    let relay = state.relay();
    eventually(Duration::from_secs(2), "registration after bad frames", || {
        relay.directory.resolve("01011112222").as_deref() == Some(id.as_str())
    })
    .await;
    assert_eq!(
        state.metrics().decode_errors.get(&[("reason", "invalid_event")]),
        3
    );
}

#[tokio::test]
async fn call_is_routed_between_sockets() {
    let (state, addr) = start(GatewayConfig::default()).await;
    let (mut caller, caller_id) = dial(addr).await;
    let (mut callee, callee_id) = dial(addr).await;

    send(&mut callee, json!({ "event": "register-user", "data": { "phoneNumber": "01022223333" } })).await;
    let relay = state.relay();
    eventually(Duration::from_secs(2), "callee registered", || {
        relay.directory.resolve("01022223333").is_some()
    })
    .await;

    send(&mut caller, json!({ "event": "call", "data": { "to": "01022223333" } })).await;

    assert_eq!(
        next_event(&mut callee).await,
        json!({ "event": "call", "data": { "from": caller_id } })
    );
    assert_eq!(
        next_event(&mut caller).await,
        json!({ "event": "call-ack", "data": { "toSocketId": callee_id } })
    );
}

#[tokio::test]
async fn closing_the_socket_releases_presence() {
    let (state, addr) = start(GatewayConfig::default()).await;
    let (mut ws, id) = dial(addr).await;

    send(&mut ws, json!({ "event": "register-user", "data": { "phoneNumber": "01011112222" } })).await;
    let relay = state.relay();
    eventually(Duration::from_secs(2), "registered", || {
        relay.directory.resolve("01011112222").is_some()
    })
    .await;

    ws.close(None).await.unwrap();

    eventually(Duration::from_secs(2), "session torn down", || {
        !relay.sessions.contains(&id)
    })
    .await;
    assert!(relay.directory.resolve("01011112222").is_none());
    assert!(relay.directory.reverse(&id).is_none());
    assert_eq!(state.metrics().ws_connections_active.get(&[]), 0);
}

#[tokio::test]
async fn oversized_frame_closes_with_size_code() {
    let mut cfg = GatewayConfig::default();
    cfg.gateway.max_payload_bytes = 1024;
    let (state, addr) = start(cfg).await;
    let (mut ws, id) = dial(addr).await;

    ws.send(Message::Text("x".repeat(2048))).await.unwrap();

    loop {
        let msg = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for close")
            .expect("socket ended without close frame")
            .unwrap();
        match msg {
            Message::Close(Some(frame)) => {
                assert_eq!(frame.code, CloseCode::Size);
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    let relay = state.relay();
    eventually(Duration::from_secs(2), "session torn down", || {
        !relay.sessions.contains(&id)
    })
    .await;
    assert_eq!(
        state.metrics().decode_errors.get(&[("reason", "too_large")]),
        1
    );
}

#[tokio::test]
async fn silent_client_is_dropped_after_keepalive_deadline() {
    let mut cfg = GatewayConfig::default();
    cfg.gateway.ping_interval_ms = 1000;
    cfg.gateway.ping_timeout_ms = 1000;
    let (state, addr) = start(cfg).await;
    let (_ws, id) = dial(addr).await;

    // the client never polls again, so no pong goes back
    let relay = state.relay();
    assert!(relay.sessions.contains(&id));
    eventually(Duration::from_secs(5), "keep-alive timeout", || {
        !relay.sessions.contains(&id)
    })
    .await;
    assert_eq!(state.metrics().ws_connections_active.get(&[]), 0);
}

#[tokio::test]
async fn unlisted_origin_is_refused_before_upgrade() {
    let mut cfg = GatewayConfig::default();
    cfg.gateway.allowed_origins = vec!["https://app.example.com".to_string()];
    let (state, addr) = start(cfg).await;

    let mut req = format!("ws://{addr}/v1/ws").into_client_request().unwrap();
    req.headers_mut()
        .insert("origin", "https://evil.example".parse().unwrap());
    match connect_async(req).await {
        Err(WsError::Http(resp)) => assert_eq!(resp.status(), 403),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("upgrade must be refused"),
    }
    assert_eq!(state.metrics().origin_rejections.get(&[]), 1);

    let mut req = format!("ws://{addr}/v1/ws").into_client_request().unwrap();
    req.headers_mut()
        .insert("origin", "https://app.example.com".parse().unwrap());
    let (mut ws, _) = connect_async(req).await.unwrap();
    assert_eq!(next_event(&mut ws).await["event"], "connected");
}
