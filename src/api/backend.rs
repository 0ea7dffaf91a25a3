use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::metrics::{operation, outcome};
use crate::simulator::{AnalysisPayload, AnalysisRequest, Simulator, StressKind};

/// Routes served by the back tier
pub struct BackendApi {
    simulator: Arc<Simulator>,
}

impl BackendApi {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator: Arc::new(simulator),
        }
    }

    pub fn simulator(&self) -> Arc<Simulator> {
        self.simulator.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/analyze", post(analyze))
            .route("/stress/:kind", post(stress))
            .route("/reset", post(reset))
            .with_state(self.simulator.clone())
    }
}

async fn analyze(
    State(simulator): State<Arc<Simulator>>,
    body: Option<Json<AnalysisRequest>>,
) -> ApiResult<Json<AnalysisPayload>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let mut timer = simulator.recorder().start(operation::ANALYSIS);

    tracing::info!("Analysis request received for data: {}", request.data);

    match simulator.analyze(&request.data).await {
        Ok(analysis) => {
            timer.resolve(analysis.outcome.label());
            Ok(Json(analysis.payload))
        }
        Err(e) => {
            timer.resolve(e.outcome_label());
            Err(e.into())
        }
    }
}

async fn stress(
    State(simulator): State<Arc<Simulator>>,
    Path(kind): Path<String>,
) -> ApiResult<(StatusCode, String)> {
    let mut timer = simulator.recorder().start(operation::STRESS);

    match simulator.stress(&StressKind::parse(&kind)) {
        Ok(ack) => {
            timer.resolve(outcome::SUCCESS);
            // The handle is dropped here, detaching the background task
            Ok((StatusCode::ACCEPTED, ack.message))
        }
        Err(e) => {
            timer.resolve(e.outcome_label());
            Err(e.into())
        }
    }
}

async fn reset(State(simulator): State<Arc<Simulator>>) -> &'static str {
    let timer = simulator.recorder().start(operation::RESET);
    simulator.reset();
    timer.finish(outcome::SUCCESS);
    "Memory cleared"
}
