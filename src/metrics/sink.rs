//! Metric sinks
//!
//! The recorder only needs to bump counters, record durations and set gauges.
//! [`FacadeSink`] forwards to the global `metrics` recorder (Prometheus in the
//! binaries); [`InMemorySink`] keeps everything in process for inspection.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::time::Duration;

/// Label set attached to a metric series
pub type Labels<'a> = &'a [(&'static str, String)];

pub trait MetricsSink: Send + Sync + 'static {
    fn increment_counter(&self, name: &'static str, labels: Labels<'_>);

    fn record_duration(&self, name: &'static str, labels: Labels<'_>, duration: Duration);

    fn set_gauge(&self, name: &'static str, labels: Labels<'_>, value: f64);
}

/// Sink backed by the `metrics` crate macros
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeSink;

fn to_labels(labels: Labels<'_>) -> Vec<::metrics::Label> {
    labels
        .iter()
        .map(|(key, value)| ::metrics::Label::new(*key, value.clone()))
        .collect()
}

impl MetricsSink for FacadeSink {
    fn increment_counter(&self, name: &'static str, labels: Labels<'_>) {
        ::metrics::counter!(name, to_labels(labels)).increment(1);
    }

    fn record_duration(&self, name: &'static str, labels: Labels<'_>, duration: Duration) {
        ::metrics::histogram!(name, to_labels(labels)).record(duration.as_secs_f64());
    }

    fn set_gauge(&self, name: &'static str, labels: Labels<'_>, value: f64) {
        ::metrics::gauge!(name, to_labels(labels)).set(value);
    }
}

/// One recorded duration
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub operation: String,
    pub outcome: String,
    pub duration: Duration,
}

/// Sink that keeps counters, gauges and duration samples in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    counters: DashMap<String, u64>,
    gauges: DashMap<String, f64>,
    samples: Mutex<Vec<MetricSample>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter series, zero if never incremented
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.counters
            .get(&series_key(name, labels.iter().copied()))
            .map(|entry| *entry)
            .unwrap_or(0)
    }

    pub fn gauge(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.gauges
            .get(&series_key(name, labels.iter().copied()))
            .map(|entry| *entry)
    }

    /// Every duration recorded so far, in recording order
    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples.lock().clone()
    }

    /// Duration samples for one operation
    pub fn samples_for(&self, operation: &str) -> Vec<MetricSample> {
        self.samples
            .lock()
            .iter()
            .filter(|sample| sample.operation == operation)
            .cloned()
            .collect()
    }
}

impl MetricsSink for InMemorySink {
    fn increment_counter(&self, name: &'static str, labels: Labels<'_>) {
        *self.counters.entry(owned_key(name, labels)).or_insert(0) += 1;
    }

    fn record_duration(&self, name: &'static str, labels: Labels<'_>, duration: Duration) {
        let label = |key: &str| {
            labels
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        tracing::trace!(metric = name, ?duration, "duration recorded");
        self.samples.lock().push(MetricSample {
            operation: label("operation"),
            outcome: label("outcome"),
            duration,
        });
    }

    fn set_gauge(&self, name: &'static str, labels: Labels<'_>, value: f64) {
        self.gauges.insert(owned_key(name, labels), value);
    }
}

fn owned_key(name: &str, labels: Labels<'_>) -> String {
    series_key(name, labels.iter().map(|(k, v)| (*k, v.as_str())))
}

fn series_key<'a>(name: &str, labels: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let rendered: Vec<String> = labels.map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}{{{}}}", name, rendered.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_series_are_keyed_by_labels() {
        let sink = InMemorySink::new();
        let success = [("outcome", "success".to_string())];
        let failure = [("outcome", "failure".to_string())];

        sink.increment_counter("requests", &success);
        sink.increment_counter("requests", &success);
        sink.increment_counter("requests", &failure);

        assert_eq!(sink.counter("requests", &[("outcome", "success")]), 2);
        assert_eq!(sink.counter("requests", &[("outcome", "failure")]), 1);
        assert_eq!(sink.counter("requests", &[("outcome", "slow")]), 0);
    }

    #[test]
    fn test_duration_samples_capture_operation_and_outcome() {
        let sink = InMemorySink::new();
        let labels = [
            ("tier", "backend".to_string()),
            ("operation", "analysis".to_string()),
            ("outcome", "slow".to_string()),
        ];

        sink.record_duration("duration", &labels, Duration::from_millis(5));

        assert_eq!(
            sink.samples(),
            vec![MetricSample {
                operation: "analysis".to_string(),
                outcome: "slow".to_string(),
                duration: Duration::from_millis(5),
            }]
        );
        assert!(sink.samples_for("reset").is_empty());
    }

    #[test]
    fn test_gauge_overwrites() {
        let sink = InMemorySink::new();
        sink.set_gauge("blocks", &[], 3.0);
        sink.set_gauge("blocks", &[], 0.0);
        assert_eq!(sink.gauge("blocks", &[]), Some(0.0));
    }

    #[test]
    fn test_facade_sink_without_recorder() {
        // No global recorder installed: calls are dropped silently
        let sink = FacadeSink;
        sink.increment_counter("noop_total", &[]);
        sink.record_duration("noop_seconds", &[], Duration::from_millis(1));
        sink.set_gauge("noop", &[], 1.0);
    }
}
