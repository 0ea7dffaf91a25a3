use thiserror::Error;

use crate::metrics::outcome;

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Backend analysis failed for data: {data}")]
    AnalysisFailed { data: String },

    #[error("Unsupported stress kind: {0}")]
    UnsupportedStressKind(String),
}

impl SimulatorError {
    /// Outcome label recorded when an operation ends with this error
    pub fn outcome_label(&self) -> &'static str {
        match self {
            SimulatorError::AnalysisFailed { .. } | SimulatorError::UnsupportedStressKind(_) => {
                outcome::FAILURE
            }
        }
    }
}

pub type SimulatorResult<T> = Result<T, SimulatorError>;
