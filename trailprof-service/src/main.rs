//! trailprof-service: HTTP microservice for elevation profiles.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TRAILPROF_PORT` | HTTP server port | 8080 |
//! | `TRAILPROF_MAX_SAMPLE_POINTS` | Points queried per profile | 50 |
//! | `TRAILPROF_INTER_POINT_DELAY_MS` | Pause between per-point requests | 100 |
//! | `TRAILPROF_PROVIDERS` | Provider priority, e.g. `image-server,open-elevation` | both |
//! | `TRAILPROF_IMAGE_SERVER_URL` | ImageServer identify URL | USGS 3DEP |
//! | `TRAILPROF_IMAGE_SERVER_TOKEN` | ArcGIS token | None |
//! | `TRAILPROF_BATCH_URL` | Batch lookup URL | Open-Elevation |
//! | `TRAILPROF_TIMEOUT_SECS` | Upstream request timeout | 30 |
//! | `RUST_LOG` | Log filter | `trailprof_service=info,trailprof=info,tower_http=info` |
//!
//! ## Endpoints
//!
//! - `POST /profile` - Elevation profile of a GeoJSON line
//! - `GET /health` - Health check
//! - `GET /config` - Active engine settings
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use trailprof::ProfileEngineBuilder;
use trailprof_service::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trailprof_service=info,trailprof=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("TRAILPROF_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // Engine settings come from TRAILPROF_* variables; a malformed value is fatal
    let engine = ProfileEngineBuilder::from_env()?.build()?;

    tracing::info!(
        providers = ?engine.provider_names(),
        max_sample_points = engine.max_sample_points(),
        inter_point_delay_ms = engine.inter_point_delay().as_millis() as u64,
        port = port,
        "Starting trailprof service"
    );

    let app = router(Arc::new(AppState { engine }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
