use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::metrics::outcome;

/// Rolls are drawn uniformly from `0..ROLL_RANGE`
pub const ROLL_RANGE: u32 = 100;
/// Rolls below this are slow
pub const SLOW_CEILING: u32 = 33;
/// Rolls below this (and not slow) fail
pub const FAILURE_CEILING: u32 = 66;

pub const MIB: usize = 1024 * 1024;

/// Value used when an analysis request carries no `data`
pub const DEFAULT_ANALYSIS_DATA: &str = "empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default = "default_analysis_data")]
    pub data: String,
}

fn default_analysis_data() -> String {
    DEFAULT_ANALYSIS_DATA.to_string()
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            data: default_analysis_data(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Slow,
    Failure,
    Success,
}

impl AnalysisOutcome {
    /// Map a roll in `0..ROLL_RANGE` onto its branch
    pub fn from_roll(roll: u32) -> Self {
        if roll < SLOW_CEILING {
            AnalysisOutcome::Slow
        } else if roll < FAILURE_CEILING {
            AnalysisOutcome::Failure
        } else {
            AnalysisOutcome::Success
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisOutcome::Slow => outcome::SLOW,
            AnalysisOutcome::Failure => outcome::FAILURE,
            AnalysisOutcome::Success => outcome::SUCCESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Neutral,
    Positive,
}

/// Body returned by a slow or successful analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub sentiment: Sentiment,
    pub slow: bool,
    pub backend: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub outcome: AnalysisOutcome,
    pub payload: AnalysisPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StressKind {
    Memory,
    Cpu,
    /// Anything else, kept verbatim for logging
    Unknown(String),
}

impl StressKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "memory" => StressKind::Memory,
            "cpu" => StressKind::Cpu,
            other => StressKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StressKind::Memory => "memory",
            StressKind::Cpu => "cpu",
            StressKind::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for StressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Name reported in the `backend` field of analysis payloads
    pub service_name: String,

    /// How long a slow analysis holds its request
    pub slow_delay: Duration,

    /// Size of each leaky bucket block
    pub block_size: usize,

    /// Blocks appended per memory stress
    pub memory_blocks: usize,

    /// Pause between appends
    pub memory_interval: Duration,

    /// Wall-clock window of a CPU burn
    pub cpu_burn: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            service_name: "chaoschain".to_string(),
            slow_delay: Duration::from_millis(5000),
            block_size: 10 * MIB,
            memory_blocks: 20,
            memory_interval: Duration::from_millis(100),
            cpu_burn: Duration::from_secs(10),
        }
    }
}

impl SimulatorConfig {
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }
}
