//! Metrics and observability module
//!
//! Key metrics exposed:
//! - Requests per tier and operation
//! - Resolved outcomes (success, slow, failure, timeout)
//! - Operation durations, recorded on every exit path
//! - Leaky bucket size

pub mod exporter;
pub mod recorder;
pub mod sink;

pub use exporter::{install_exporter, metrics_route, render_metrics, MetricsError};
pub use recorder::{
    init_metrics, operation, outcome, OperationTimer, Recorder, BUCKET_BLOCKS,
    OPERATION_DURATION, OUTCOMES_TOTAL, REQUESTS_TOTAL, TIER_BACKEND, TIER_FRONTEND,
};
pub use sink::{FacadeSink, InMemorySink, MetricSample, MetricsSink};
