use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::simulator::DEFAULT_ANALYSIS_DATA;

/// Header carrying the correlation id between tiers
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Root URL of the back tier, without a trailing slash
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connect_timeout: DEFAULT_BACKEND_TIMEOUT,
            request_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.request_timeout = timeout;
        self
    }
}

/// Analysis payload forwarded to the back tier as received
pub type AnalysisBody = Map<String, Value>;

/// Fill in `data` when the client left it out. Every other field is kept.
pub fn with_default_data(mut body: AnalysisBody) -> AnalysisBody {
    body.entry("data")
        .or_insert_with(|| Value::String(DEFAULT_ANALYSIS_DATA.to_string()));
    body
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalindromeRequest {
    #[serde(default)]
    pub data: String,
}
