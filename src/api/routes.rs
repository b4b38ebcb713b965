//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/api/v1/hello", get(handlers::hello))
        // Prediction records
        .route("/api/v1/data", get(handlers::list_data))
        .route("/api/v1/symbols", get(handlers::list_symbols))
        .with_state(state)
}
