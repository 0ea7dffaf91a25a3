use thiserror::Error;

use crate::metrics::outcome;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Gateway Timeout: Backend service is too slow ({0})")]
    GatewayTimeout(String),

    #[error("Backend service failed {operation} with status {status}")]
    Downstream { operation: &'static str, status: u16 },

    #[error("Failed to reach backend service: {0}")]
    Transport(String),
}

impl ProxyError {
    /// Outcome label recorded when a forwarded call ends with this error
    pub fn outcome_label(&self) -> &'static str {
        match self {
            ProxyError::GatewayTimeout(_) => outcome::TIMEOUT,
            ProxyError::Downstream { .. } | ProxyError::Transport(_) => outcome::FAILURE,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        // Deadline hits and unreachable backends both surface as gateway timeouts
        if err.is_timeout() || err.is_connect() {
            ProxyError::GatewayTimeout(err.to_string())
        } else {
            ProxyError::Transport(err.to_string())
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
