pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::filter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Filtered view and dataset
        .route("/api/v1/records", get(handlers::handle_get_records))
        .route(
            "/api/v1/records/:analysis_id",
            get(handlers::handle_get_record),
        )
        .route("/api/v1/options", get(handlers::handle_get_options))
        .route("/api/v1/stats", get(handlers::handle_get_stats))
        .route(
            "/api/v1/dataset/reload",
            post(handlers::handle_reload_dataset),
        )
        // Filter state
        .route(
            "/api/v1/filters",
            get(handlers::handle_get_filters).put(handlers::handle_update_filter),
        )
        .route("/api/v1/filters/reset", post(handlers::handle_reset_filters))
        .route(
            "/api/v1/filters/:dimension",
            delete(handlers::handle_clear_filter),
        )
        .route(
            "/api/v1/filters/:dimension/values/:value",
            delete(handlers::handle_remove_filter_value),
        )
        .with_state(state)
}
