use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/api/analyze", post(handlers::analyze_handler))
        .route("/api/analysis/{id}", get(handlers::get_analysis_handler))
        .route("/api/recent", get(handlers::recent_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
