//! trailprof service library
//!
//! HTTP handlers, OpenAPI document and router for the elevation profile
//! service. Used by both the `trailprof-service` binary and the integration
//! tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use trailprof::ProfileEngine;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Engine that samples paths and queries elevation providers.
    pub engine: ProfileEngine,
}

// Re-export commonly used types for convenience
pub use handlers::{
    ConfigResponse, ErrorResponse, HealthResponse, ProfileResponse, PROVIDERS_UNAVAILABLE_MESSAGE,
};

/// OpenAPI documentation for the profile service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "trailprof Elevation Profile Service",
        version = "0.1.0",
        description = "Elevation profiles and trail statistics for stream and trail polylines.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::post_profile,
        handlers::health_check,
        handlers::get_config,
    ),
    components(
        schemas(
            handlers::ProfileResponse,
            handlers::ConfigResponse,
            handlers::ProviderInfo,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "profile", description = "Elevation profile endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router with docs, tracing and CORS layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/profile", post(handlers::post_profile))
        .route("/health", get(handlers::health_check))
        .route("/config", get(handlers::get_config))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
