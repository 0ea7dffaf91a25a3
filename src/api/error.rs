use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::types::ErrorResponse;
use crate::proxy::ProxyError;
use crate::simulator::SimulatorError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Simulator error: {0}")]
    Simulator(#[from] SimulatorError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),
}

fn json_error(status: StatusCode, error: impl Into<String>, code: Option<&str>) -> Response {
    let body = Json(ErrorResponse {
        error: error.into(),
        code: code.map(str::to_string),
    });

    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Simulator(SimulatorError::AnalysisFailed { .. }) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Backend analysis failed",
                Some("ANALYSIS_FAILED"),
            ),
            ApiError::Simulator(SimulatorError::UnsupportedStressKind(_)) => {
                (StatusCode::BAD_REQUEST, "Unknown stress type").into_response()
            }
            ApiError::Proxy(ProxyError::GatewayTimeout(_)) => json_error(
                StatusCode::GATEWAY_TIMEOUT,
                "Gateway Timeout: Backend service is too slow",
                None,
            ),
            ApiError::Proxy(ProxyError::Downstream { operation, status }) => json_error(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("Backend service failed {operation}"),
                None,
            ),
            ApiError::Proxy(ProxyError::Transport(_)) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to reach backend service",
                None,
            ),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
