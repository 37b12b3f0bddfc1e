//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        .route("/grid", post(handlers::build_grid))
        .route("/export", post(handlers::export_csv))
        .route("/analyze-image", post(handlers::analyze_image))
        .route("/stats", get(handlers::get_stats));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/process", post(handlers::process_schedule))
        .nest("/v1", api_v1)
        // Allow full-resolution schedule screenshots during uploads.
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ImageProcessor, ScheduleProcessor};
    use crate::vision::FixedTextExtractor;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let image_processor =
            ImageProcessor::new(Arc::new(FixedTextExtractor::new("MATH 27\nCAS-B2")));
        let state = AppState::new(ScheduleProcessor::default(), image_processor);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
