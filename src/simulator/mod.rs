//! Load and chaos simulator for the back tier
//!
//! Produces the artificial signals the dashboards are built around:
//! - randomly slow, failing or successful analyses
//! - background memory growth held in a [`LeakyBucket`]
//! - a fixed-window CPU burn

pub mod bucket;
pub mod engine;
pub mod error;
pub mod types;

pub use bucket::LeakyBucket;
pub use engine::{burn_cpu, Simulator, StressAck};
pub use error::{SimulatorError, SimulatorResult};
pub use types::{
    Analysis, AnalysisOutcome, AnalysisPayload, AnalysisRequest, Sentiment, SimulatorConfig,
    StressKind, DEFAULT_ANALYSIS_DATA,
};
