//! Minimal metrics registry for the relay.
//!
//! Labels are flattened into sorted key vectors so rendering order is stable
//! per series.

use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use dashmap::DashMap;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn write_series(out: &mut String, name: &str, key: &LabelKey, val: impl std::fmt::Display) {
    if key.is_empty() {
        let _ = writeln!(out, "{name} {val}");
        return;
    }
    let labels = key
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{name}{{{labels}}} {val}");
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for one label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            write_series(out, name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    fn add(&self, labels: &[(&str, &str)], v: i64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            write_series(out, name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub ws_connections_active: GaugeVec,
    /// Labels: `event`, `outcome`.
    pub events: CounterVec,
    /// Labels: `reason`.
    pub decode_errors: CounterVec,
    pub origin_rejections: CounterVec,
    /// Labels: `outcome`.
    pub inference_requests: CounterVec,
}

impl GatewayMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.ws_connections_active.render("callgate_ws_connections_active", &mut out);
        self.events.render("callgate_events_total", &mut out);
        self.decode_errors.render("callgate_decode_errors_total", &mut out);
        self.origin_rejections.render("callgate_origin_rejections_total", &mut out);
        self.inference_requests.render("callgate_inference_requests_total", &mut out);
        out
    }
}
