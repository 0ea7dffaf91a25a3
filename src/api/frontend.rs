use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::error::ApiResult;
use crate::metrics::{operation, outcome, OperationTimer, Recorder};
use crate::proxy::{
    palindrome, with_default_data, AnalysisBody, BackendClient, PalindromeRequest, ProxyError,
    ProxyResult, REQUEST_ID_HEADER,
};

#[derive(Debug, Clone)]
pub struct FrontendState {
    pub client: BackendClient,
    pub recorder: Recorder,
}

/// Routes served by the front tier
pub struct FrontendApi {
    state: FrontendState,
}

impl FrontendApi {
    pub fn new(client: BackendClient, recorder: Recorder) -> Self {
        Self {
            state: FrontendState { client, recorder },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/palindrome", post(check_palindrome))
            .route("/analyze", post(analyze))
            .route("/stress/:kind", post(trigger_stress))
            .route("/reset", post(trigger_reset))
            .with_state(self.state.clone())
    }
}

fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Resolve the timer from a forwarded call and log failures
fn observe<T>(timer: &mut OperationTimer, result: &ProxyResult<T>) {
    match result {
        Ok(_) => timer.resolve(outcome::SUCCESS),
        Err(e) => {
            match e {
                ProxyError::GatewayTimeout(detail) => tracing::error!(
                    "Backend {} TIMED OUT after {:?}: {}",
                    timer.operation(),
                    timer.elapsed(),
                    detail
                ),
                other => tracing::error!(
                    "Backend {} FAILED after {:?}: {}",
                    timer.operation(),
                    timer.elapsed(),
                    other
                ),
            }
            timer.resolve(e.outcome_label());
        }
    }
}

async fn check_palindrome(
    State(state): State<FrontendState>,
    body: Option<Json<PalindromeRequest>>,
) -> String {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let timer = state.recorder.start(operation::PALINDROME);

    let verdict = palindrome::check(&request.data);
    tracing::info!("Checking palindrome for: {}", verdict.normalized);

    timer.finish(outcome::SUCCESS);
    verdict.to_string()
}

async fn analyze(
    State(state): State<FrontendState>,
    headers: HeaderMap,
    body: Option<Json<AnalysisBody>>,
) -> ApiResult<Response> {
    let payload = with_default_data(body.map(|Json(body)| body).unwrap_or_default());
    let mut timer = state.recorder.start(operation::ANALYSIS);

    tracing::info!(
        "Received sentiment request, calling backend at {} with data: {}...",
        state.client.config().base_url,
        payload["data"]
    );

    let result = state.client.analyze(&payload, request_id(&headers)).await;
    observe(&mut timer, &result);
    let body = result?;

    tracing::info!("Backend analysis successful: {}", body);
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn trigger_stress(
    State(state): State<FrontendState>,
    headers: HeaderMap,
    Path(kind): Path<String>,
) -> ApiResult<String> {
    let mut timer = state.recorder.start(operation::STRESS);

    tracing::warn!(
        "TRIGGERING STRESS TEST: {} on backend {}",
        kind,
        state.client.config().base_url
    );

    let result = state.client.stress(&kind, request_id(&headers)).await;
    observe(&mut timer, &result);

    Ok(format!("Stress initiated: {}", result?))
}

async fn trigger_reset(
    State(state): State<FrontendState>,
    headers: HeaderMap,
) -> ApiResult<&'static str> {
    let mut timer = state.recorder.start(operation::RESET);

    let result = state.client.reset(request_id(&headers)).await;
    observe(&mut timer, &result);
    result?;

    Ok("Backend memory cleared.")
}
