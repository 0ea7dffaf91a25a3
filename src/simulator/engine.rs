use rand::Rng;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use super::bucket::LeakyBucket;
use super::error::{SimulatorError, SimulatorResult};
use super::types::{
    Analysis, AnalysisOutcome, AnalysisPayload, Sentiment, SimulatorConfig, StressKind, MIB,
    ROLL_RANGE,
};
use crate::metrics::Recorder;

/// Acknowledgement for stress work accepted onto a background task.
///
/// Request handlers drop the handle, which detaches the task: nothing it
/// produces is ever reported back to the caller.
#[derive(Debug)]
pub struct StressAck {
    pub kind: StressKind,
    pub message: String,
    pub handle: JoinHandle<()>,
}

pub struct Simulator {
    config: SimulatorConfig,
    bucket: LeakyBucket,
    recorder: Recorder,
}

impl Simulator {
    pub fn new(config: SimulatorConfig, recorder: Recorder) -> Self {
        Self::with_bucket(config, LeakyBucket::new(), recorder)
    }

    pub fn with_bucket(config: SimulatorConfig, bucket: LeakyBucket, recorder: Recorder) -> Self {
        Self {
            config,
            bucket,
            recorder,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn bucket(&self) -> &LeakyBucket {
        &self.bucket
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Run an analysis with a freshly drawn roll
    pub async fn analyze(&self, data: &str) -> SimulatorResult<Analysis> {
        let roll = rand::thread_rng().gen_range(0..ROLL_RANGE);
        self.analyze_roll(data, roll).await
    }

    /// Run an analysis for a given roll in `0..ROLL_RANGE`
    pub async fn analyze_roll(&self, data: &str, roll: u32) -> SimulatorResult<Analysis> {
        match AnalysisOutcome::from_roll(roll) {
            AnalysisOutcome::Slow => {
                tracing::warn!("This analysis will be slow for data: {}", data);
                tokio::time::sleep(self.config.slow_delay).await;
                Ok(Analysis {
                    outcome: AnalysisOutcome::Slow,
                    payload: self.payload(Sentiment::Neutral, true),
                })
            }
            AnalysisOutcome::Failure => {
                tracing::error!("Analysis failed for data: {}!", data);
                Err(SimulatorError::AnalysisFailed {
                    data: data.to_string(),
                })
            }
            AnalysisOutcome::Success => {
                tracing::info!("Analysis successful for data: {}", data);
                Ok(Analysis {
                    outcome: AnalysisOutcome::Success,
                    payload: self.payload(Sentiment::Positive, false),
                })
            }
        }
    }

    /// Start stress work in the background and acknowledge immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn stress(&self, kind: &StressKind) -> SimulatorResult<StressAck> {
        match kind {
            StressKind::Memory => {
                tracing::warn!("Received MEMORY STRESS request. Starting in background...");
                let handle = tokio::spawn(fill_bucket(
                    self.bucket.clone(),
                    self.config.clone(),
                    self.recorder.clone(),
                ));

                Ok(StressAck {
                    kind: StressKind::Memory,
                    message: "Memory stress test initiated in background.".to_string(),
                    handle,
                })
            }
            StressKind::Cpu => {
                tracing::warn!("Received CPU STRESS request. Starting in background...");
                let window = self.config.cpu_burn;
                let handle = tokio::task::spawn_blocking(move || {
                    burn_cpu(window);
                });

                Ok(StressAck {
                    kind: StressKind::Cpu,
                    message: format!(
                        "CPU stress test initiated in background ({}s duration).",
                        window.as_secs()
                    ),
                    handle,
                })
            }
            StressKind::Unknown(raw) => {
                tracing::warn!("Rejected unknown stress type: {}", raw);
                Err(SimulatorError::UnsupportedStressKind(raw.clone()))
            }
        }
    }

    /// Empty the leaky bucket, returning how many blocks were released
    pub fn reset(&self) -> usize {
        let released = self
            .bucket
            .clear_with(|| self.recorder.set_bucket_blocks(0));
        tracing::info!(released, "Memory cleared.");
        released
    }

    fn payload(&self, sentiment: Sentiment, slow: bool) -> AnalysisPayload {
        AnalysisPayload {
            sentiment,
            slow,
            backend: self.config.service_name.clone(),
        }
    }
}

async fn fill_bucket(bucket: LeakyBucket, config: SimulatorConfig, recorder: Recorder) {
    tracing::warn!("[Background] Starting MEMORY allocation...");

    for _ in 0..config.memory_blocks {
        // Gauge is written under the bucket lock so it never trails a reset
        let total = bucket.push_block_with(config.block_size, |len| {
            recorder.set_bucket_blocks(len)
        });
        tracing::info!(
            "[Background] Allocated {}MB. Total chunks: {}",
            config.block_size / MIB,
            total
        );
        tokio::time::sleep(config.memory_interval).await;
    }

    tracing::warn!(
        "[Background] Memory stress complete. Total allocated: {}MB",
        bucket.allocated_bytes() / MIB
    );
}

/// Spin the current thread on throwaway floating point work for `window`.
///
/// Returns the number of iterations performed.
pub fn burn_cpu(window: Duration) -> u64 {
    tracing::warn!("[Background] Starting CPU burn for {:?}...", window);

    let mut rng = rand::thread_rng();
    let deadline = Instant::now() + window;
    let mut iterations = 0u64;

    while Instant::now() < deadline {
        let base: f64 = rng.gen();
        let exponent: f64 = rng.gen();
        std::hint::black_box(base.powf(exponent));
        iterations += 1;
    }

    tracing::warn!("[Background] CPU burn complete.");
    iterations
}
