// Latest reading per (metric kind, container), rendered as Prometheus text.

use crate::models::{MetricKind, MetricSample};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{PoisonError, RwLock};

/// One stored reading as returned by [`MetricsStore::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub kind: MetricKind,
    pub container_name: String,
    pub value: f64,
}

/// Process-lifetime gauge store shared by the sampler (writer) and `/metrics` (readers).
///
/// Entries are created on first write and replaced on every later write. They are
/// never removed, so a container that stops keeps exposing its last reading.
#[derive(Debug, Default)]
pub struct MetricsStore {
    values: RwLock<BTreeMap<(MetricKind, String), f64>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one value.
    pub fn write(&self, kind: MetricKind, container_name: &str, value: f64) {
        // A panicking writer cannot leave a half-written f64 behind, so poison is ignored.
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert((kind, container_name.to_string()), value);
    }

    /// Write all eight gauges of a converted sample.
    pub fn write_sample(&self, sample: &MetricSample) {
        for (kind, value) in sample.values() {
            self.write(kind, &sample.name, value);
        }
    }

    /// All entries ordered by metric kind, then container name.
    pub fn snapshot(&self) -> Vec<MetricEntry> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values
            .iter()
            .map(|((kind, name), value)| MetricEntry {
                kind: *kind,
                container_name: name.clone(),
                value: *value,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text exposition format: HELP/TYPE once per kind that has entries, then one line per container.
    pub fn render(&self) -> String {
        format_prometheus(&self.snapshot())
    }
}

pub fn format_prometheus(entries: &[MetricEntry]) -> String {
    let mut output = String::new();
    let mut current: Option<MetricKind> = None;
    for entry in entries {
        let name = entry.kind.name();
        if current != Some(entry.kind) {
            let _ = writeln!(output, "# HELP {} {}", name, entry.kind.help());
            let _ = writeln!(output, "# TYPE {} gauge", name);
            current = Some(entry.kind);
        }
        let _ = writeln!(
            output,
            "{}{{container_name=\"{}\"}} {}",
            name,
            escape_label_value(&entry.container_name),
            format_value(entry.value)
        );
    }
    output
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() && value > 0.0 {
        "+Inf".to_string()
    } else if value.is_infinite() {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Backslash, double-quote, and newline must be escaped.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
