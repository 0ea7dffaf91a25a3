mod backend;
mod error;
mod frontend;
mod types;

pub use backend::BackendApi;
pub use error::{ApiError, ApiResult};
pub use frontend::{FrontendApi, FrontendState};
pub use types::*;

use crate::metrics::{metrics_route, Recorder};
use crate::proxy::BackendClient;
use crate::simulator::Simulator;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Create the back tier server: simulator routes plus health and metrics
pub fn create_backend_server(simulator: Simulator) -> Router {
    with_common_routes(BackendApi::new(simulator).router())
}

/// Create the front tier server: proxy and palindrome routes plus health and metrics
pub fn create_frontend_server(client: BackendClient, recorder: Recorder) -> Router {
    with_common_routes(FrontendApi::new(client, recorder).router())
}

fn with_common_routes(router: Router) -> Router {
    // Configure CORS so dashboards can call the services directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .route("/health", get(health_check))
        .route("/metrics", metrics_route())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

async fn health_check() -> &'static str {
    "OK"
}
