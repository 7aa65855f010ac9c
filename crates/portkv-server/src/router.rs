use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const PORTS: &str = "/v1/ports";
    pub const PORT: &str = "/v1/ports/:port";
}

/// Build the axum router with all port endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::PORTS, get(handler::ports_handler))
        .route(endpoints::PORT, post(handler::port_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
