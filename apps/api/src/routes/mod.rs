pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/requirements/parse",
            post(handlers::handle_parse_requirements),
        )
        .route(
            "/api/v1/requirements/normalize",
            post(handlers::handle_normalize_requirements),
        )
        .route("/api/v1/fit", post(handlers::handle_fit))
        .route("/api/v1/generate", post(handlers::handle_generate))
        .route("/api/v1/download", post(handlers::handle_download))
        .with_state(state)
}
