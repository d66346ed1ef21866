pub mod health;

use axum::{routing::get, Router};

use crate::salary::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Salary API
        .route(
            "/api/v1/salary/estimate",
            get(handlers::handle_estimate_query).post(handlers::handle_estimate),
        )
        .route("/api/v1/salary/specialties", get(handlers::handle_specialties))
        .with_state(state)
}
