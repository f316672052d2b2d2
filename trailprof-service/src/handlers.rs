//! HTTP request handlers for the profile service.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use trailprof::geodesy::validate_path;
use trailprof::geojson::{coordinates_from_geojson, profile_to_feature};
use trailprof::{Coordinate, ElevationProfile, ElevationSample, ProfileError, ProfileStatistics};
use utoipa::ToSchema;

use crate::AppState;

/// Shown to clients when no provider could answer.
pub const PROVIDERS_UNAVAILABLE_MESSAGE: &str =
    "Elevation data is temporarily unavailable. Please try again later.";

/// Plain coordinate-list request body.
#[derive(Debug, Deserialize)]
pub struct CoordinatesRequest {
    /// Path as `[lon, lat]` pairs.
    pub coordinates: Vec<Vec<f64>>,
}

/// Successful profile response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Sampled points with elevation and cumulative distance.
    #[schema(value_type = Vec<Object>)]
    pub samples: Vec<ElevationSample>,
    /// Summary statistics of the profile.
    #[schema(value_type = Object)]
    pub statistics: ProfileStatistics,
    /// The profile as a GeoJSON LineString with elevation as Z.
    #[schema(value_type = Object)]
    pub feature: Feature,
}

impl From<ElevationProfile> for ProfileResponse {
    fn from(profile: ElevationProfile) -> Self {
        let feature = profile_to_feature(&profile);
        Self {
            samples: profile.samples,
            statistics: profile.statistics,
            feature,
        }
    }
}

/// One configured provider.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub name: String,
    pub endpoint: Option<String>,
}

/// Active engine settings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Upper bound on points queried per profile.
    pub max_sample_points: usize,
    /// Pause between per-point requests, in milliseconds.
    pub inter_point_delay_ms: u64,
    /// Providers in the order they are tried.
    pub providers: Vec<ProviderInfo>,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Read the path out of a request body.
///
/// Bodies with a `type` member are parsed as GeoJSON (geometry, feature or
/// feature collection); anything else must be `{"coordinates": [[lon, lat], ...]}`.
/// The error string is meant for the client.
pub fn path_from_body(body: Value) -> Result<Vec<Coordinate>, String> {
    let path = if body.get("type").is_some() {
        let geojson =
            GeoJson::from_json_value(body).map_err(|e| format!("Invalid GeoJSON: {}", e))?;
        coordinates_from_geojson(&geojson)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "Geometry must be a LineString or MultiLineString".to_string())?
    } else {
        let request: CoordinatesRequest =
            serde_json::from_value(body).map_err(|e| format!("Invalid request body: {}", e))?;
        request
            .coordinates
            .iter()
            .map(|p| match p.as_slice() {
                [lon, lat, ..] => Ok(Coordinate::new(*lon, *lat)),
                _ => Err("Coordinate must have at least 2 elements (lon, lat)".to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    validate_path(&path).map_err(|e| e.to_string())?;

    Ok(path)
}

/// Compute the elevation profile of a line.
///
/// # Returns
///
/// - `200 OK` with the profile
/// - `400 Bad Request` if the body is not a line with at least 2 points
/// - `502 Bad Gateway` if no elevation provider could answer
/// - `500 Internal Server Error` on unexpected errors
#[utoipa::path(
    post,
    path = "/profile",
    tag = "profile",
    request_body(
        content = Object,
        description = "GeoJSON LineString/MultiLineString (bare, Feature or FeatureCollection) or {\"coordinates\": [[lon, lat], ...]}"
    ),
    responses(
        (status = 200, description = "Elevation profile", body = ProfileResponse),
        (status = 400, description = "Not a usable line", body = ErrorResponse),
        (status = 502, description = "All elevation providers failed", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    )
)]
pub async fn post_profile(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let path = match path_from_body(body) {
        Ok(path) => path,
        Err(message) => {
            tracing::warn!(error = %message, "Rejected profile request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response();
        }
    };

    tracing::debug!(points = path.len(), "Profile request");

    match state.engine.get_profile(&path).await {
        Ok(profile) => {
            tracing::info!(
                input_points = path.len(),
                samples = profile.len(),
                total_distance_m = profile.statistics.total_distance_meters,
                gain_m = profile.statistics.elevation_gain,
                "Profile computed"
            );
            (StatusCode::OK, Json(ProfileResponse::from(profile))).into_response()
        }
        Err(e) => error_response(path.len(), e),
    }
}

/// Create an error response for profile requests.
fn error_response(points: usize, e: ProfileError) -> Response {
    let (status, message) = match &e {
        ProfileError::Input { .. } | ProfileError::InvalidCoordinate { .. } => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        ProfileError::AllProvidersFailed { .. } => (
            StatusCode::BAD_GATEWAY,
            PROVIDERS_UNAVAILABLE_MESSAGE.to_string(),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    tracing::warn!(points = points, error = %e, "Profile request failed");

    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Active engine configuration.
#[utoipa::path(
    get,
    path = "/config",
    tag = "system",
    responses((status = 200, description = "Engine settings", body = ConfigResponse))
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let engine = &state.engine;

    Json(ConfigResponse {
        max_sample_points: engine.max_sample_points(),
        inter_point_delay_ms: engine.inter_point_delay().as_millis() as u64,
        providers: engine
            .provider_endpoints()
            .into_iter()
            .map(|(name, endpoint)| ProviderInfo {
                name: name.to_string(),
                endpoint: endpoint.map(str::to_string),
            })
            .collect(),
    })
}
