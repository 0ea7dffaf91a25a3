use reqwest::{Client, Url};

use super::error::{ProxyError, ProxyResult};
use super::types::{AnalysisBody, ProxyConfig, REQUEST_ID_HEADER};
use crate::metrics::operation;

/// HTTP client for the back tier
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
    config: ProxyConfig,
}

impl BackendClient {
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        tracing::debug!(
            "Creating backend client for {} with {:?} timeout",
            config.base_url,
            config.request_timeout
        );

        let base = Url::parse(&config.base_url).map_err(|e| {
            ProxyError::Transport(format!("invalid backend url {}: {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(ProxyError::Transport(format!(
                "backend url {} cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        Ok(Self { http, base, config })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Back tier URL for the given path segments.
    ///
    /// Each segment is percent-encoded as a whole, so `?`, `#`, `%` and `/`
    /// inside one never change which endpoint is reached.
    pub fn endpoint(&self, segments: &[&str]) -> ProxyResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProxyError::Transport(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Forward an analysis and return the downstream body verbatim
    pub async fn analyze(
        &self,
        body: &AnalysisBody,
        request_id: Option<&str>,
    ) -> ProxyResult<String> {
        let url = self.endpoint(&["analyze"])?;
        self.post(operation::ANALYSIS, url, Some(body), request_id)
            .await
    }

    /// Forward a stress request; `kind` always stays a single path segment
    pub async fn stress(&self, kind: &str, request_id: Option<&str>) -> ProxyResult<String> {
        let url = self.endpoint(&["stress", kind])?;
        self.post(operation::STRESS, url, None, request_id).await
    }

    pub async fn reset(&self, request_id: Option<&str>) -> ProxyResult<String> {
        let url = self.endpoint(&["reset"])?;
        self.post(operation::RESET, url, None, request_id).await
    }

    async fn post(
        &self,
        operation: &'static str,
        url: Url,
        body: Option<&AnalysisBody>,
        request_id: Option<&str>,
    ) -> ProxyResult<String> {
        tracing::debug!("Forwarding {} to {}", operation, url);
        let mut request = self.http.post(url.clone());

        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(id) = request_id {
            request = request.header(REQUEST_ID_HEADER, id);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!("Backend {} FAILED: {} returned {}", operation, url, status);
            return Err(ProxyError::Downstream {
                operation,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
