//! Metrics recorder for chaos operations
//!
//! Every public operation on either tier is wrapped in an [`OperationTimer`].
//! The timer counts the request when it starts and records exactly one
//! outcome increment and one duration sample when it is dropped.

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::sink::{FacadeSink, MetricsSink};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub const REQUESTS_TOTAL: &str = "chaos_requests_total";
pub const OUTCOMES_TOTAL: &str = "chaos_outcomes_total";
pub const OPERATION_DURATION: &str = "chaos_operation_duration_seconds";
pub const BUCKET_BLOCKS: &str = "chaos_leaky_bucket_blocks";

pub const TIER_BACKEND: &str = "backend";
pub const TIER_FRONTEND: &str = "frontend";

/// Operation names used as the `operation` label
pub mod operation {
    pub const ANALYSIS: &str = "analysis";
    pub const PALINDROME: &str = "palindrome";
    pub const STRESS: &str = "stress";
    pub const RESET: &str = "reset";
}

/// Outcome labels
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const SLOW: &str = "slow";
    pub const FAILURE: &str = "failure";
    pub const TIMEOUT: &str = "timeout";
}

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(REQUESTS_TOTAL, "Total requests received per operation");
    describe_counter!(
        OUTCOMES_TOTAL,
        "Completed operations per resolved outcome (success, slow, failure, timeout)"
    );
    describe_histogram!(
        OPERATION_DURATION,
        Unit::Seconds,
        "Time from operation start to completion, on every exit path"
    );
    describe_gauge!(BUCKET_BLOCKS, "Blocks currently held by the leaky bucket");
}

/// Per-tier handle for recording operations
#[derive(Clone)]
pub struct Recorder {
    tier: &'static str,
    sink: Arc<dyn MetricsSink>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder").field("tier", &self.tier).finish()
    }
}

impl Recorder {
    pub fn new(tier: &'static str, sink: Arc<dyn MetricsSink>) -> Self {
        Self { tier, sink }
    }

    /// Recorder writing to the global `metrics` recorder
    pub fn facade(tier: &'static str) -> Self {
        Self::new(tier, Arc::new(FacadeSink))
    }

    /// Count a request and start timing it
    pub fn start(&self, operation: &'static str) -> OperationTimer {
        self.sink.increment_counter(
            REQUESTS_TOTAL,
            &[
                ("tier", self.tier.to_string()),
                ("operation", operation.to_string()),
            ],
        );

        OperationTimer {
            tier: self.tier,
            sink: self.sink.clone(),
            operation,
            outcome: None,
            start_time: Instant::now(),
        }
    }

    pub fn set_bucket_blocks(&self, blocks: usize) {
        self.sink
            .set_gauge(BUCKET_BLOCKS, &[("tier", self.tier.to_string())], blocks as f64);
    }
}

/// Scoped timer for one operation.
///
/// Records on drop, so early returns and unwinding still close the sample.
/// A timer dropped without an outcome is recorded as a failure.
pub struct OperationTimer {
    tier: &'static str,
    sink: Arc<dyn MetricsSink>,
    operation: &'static str,
    outcome: Option<&'static str>,
    start_time: Instant,
}

impl OperationTimer {
    /// Set the outcome that will be recorded; the last call wins
    pub fn resolve(&mut self, outcome: &'static str) {
        self.outcome = Some(outcome);
    }

    /// Resolve and record immediately
    pub fn finish(mut self, outcome: &'static str) {
        self.resolve(outcome);
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(outcome::FAILURE);
        let labels = [
            ("tier", self.tier.to_string()),
            ("operation", self.operation.to_string()),
            ("outcome", outcome.to_string()),
        ];

        self.sink.increment_counter(OUTCOMES_TOTAL, &labels);
        self.sink
            .record_duration(OPERATION_DURATION, &labels, self.start_time.elapsed());
    }
}
