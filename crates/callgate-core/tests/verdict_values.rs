//! Verdict validation and outbound event encoding.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use callgate_core::protocol::inbound::VerdictRequest;
use callgate_core::protocol::outbound::OutboundEvent;
use callgate_core::protocol::verdict::{clamp_probability, probability, VerdictRejection};

fn request(v: serde_json::Value) -> VerdictRequest {
    serde_json::from_value(v).unwrap()
}

#[test]
fn out_of_range_probabilities_are_clamped() {
    let verdict = request(json!({ "to": "c2", "pFake": 1.5, "pReal": -0.2 }))
        .validate()
        .unwrap();
    assert_eq!(verdict.p_fake, 1.0);
    assert_eq!(verdict.p_real, 0.0);
    assert_eq!(verdict.to, "c2");
    assert!(verdict.ts.is_none());
}

#[test]
fn non_finite_values_are_rejected() {
    assert_eq!(clamp_probability(f64::NAN), None);
    assert_eq!(clamp_probability(f64::INFINITY), None);
    assert_eq!(clamp_probability(f64::NEG_INFINITY), None);
    assert_eq!(clamp_probability(0.25), Some(0.25));
}

#[test]
fn non_numeric_values_are_rejected() {
    assert_eq!(probability(&json!("0.5")), None);
    assert_eq!(probability(&json!(null)), None);
    assert_eq!(probability(&json!(true)), None);
    assert_eq!(probability(&json!(1)), Some(1.0));

    let err = request(json!({ "to": "c2", "pFake": "0.9", "pReal": 0.1 }))
        .validate()
        .unwrap_err();
    assert_eq!(err, VerdictRejection::InvalidProbability);

    // one bad field poisons the whole message
    let err = request(json!({ "to": "c2", "pFake": 0.9 })).validate().unwrap_err();
    assert_eq!(err, VerdictRejection::InvalidProbability);
}

#[test]
fn sender_timestamp_must_be_numeric() {
    let verdict = request(json!({ "to": "c2", "pFake": 0.5, "pReal": 0.5, "ts": 1200 }))
        .validate()
        .unwrap();
    assert_eq!(verdict.ts, Some(1200.0));

    let verdict = request(json!({ "to": "c2", "pFake": 0.5, "pReal": 0.5, "ts": null }))
        .validate()
        .unwrap();
    assert!(verdict.ts.is_none());

    let err = request(json!({ "to": "c2", "pFake": 0.5, "pReal": 0.5, "ts": "123" }))
        .validate()
        .unwrap_err();
    assert_eq!(err, VerdictRejection::InvalidTimestamp);
    assert_eq!(err.as_str(), "invalid_timestamp");
}

#[test]
fn empty_target_is_rejected_first() {
    let err = request(json!({ "to": "", "pFake": "x", "pReal": 0.1 }))
        .validate()
        .unwrap_err();
    assert_eq!(err, VerdictRejection::EmptyTarget);
    assert_eq!(err.as_str(), "empty_target");
}

#[test]
fn outbound_wire_shape() {
    let ended = OutboundEvent::CallEnded.to_json().unwrap();
    assert_eq!(ended, r#"{"event":"call-ended"}"#);

    let ack: serde_json::Value = serde_json::from_str(
        &OutboundEvent::CallAck { to_socket_id: "c2".into() }.to_json().unwrap(),
    )
    .unwrap();
    assert_eq!(ack, json!({ "event": "call-ack", "data": { "toSocketId": "c2" } }));

    let verdict: serde_json::Value = serde_json::from_str(
        &OutboundEvent::DeepfakeVerdict {
            from: "c1".into(),
            call_id: None,
            p_fake: 1.0,
            p_real: 0.0,
            ts: 1000.0,
        }
        .to_json()
        .unwrap(),
    )
    .unwrap();
    assert_eq!(verdict["event"], "deepfake-verdict");
    assert_eq!(verdict["data"]["pFake"], 1.0);
    assert_eq!(verdict["data"]["pReal"], 0.0);
    assert!(verdict["data"].get("callId").is_none());
}
