//! Integration tests for the HTTP API.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use trailprof::provider::{ElevationProvider, LookupFuture};
use trailprof::{Coordinate, ProfileEngine, ProfileError};
use trailprof_service::{router, AppState, PROVIDERS_UNAVAILABLE_MESSAGE};

/// Provider answering with elevations that rise 10 m per point.
struct Ramp {
    calls: Mutex<Vec<usize>>,
}

impl ElevationProvider for Ramp {
    fn name(&self) -> &str {
        "ramp"
    }

    fn lookup<'a>(&'a self, coords: &'a [Coordinate]) -> LookupFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(coords.len());
            Ok((0..coords.len()).map(|i| 1000.0 + 10.0 * i as f64).collect())
        })
    }
}

/// Provider that always fails.
struct Down;

impl ElevationProvider for Down {
    fn name(&self) -> &str {
        "down"
    }

    fn endpoint(&self) -> Option<&str> {
        Some("http://down.invalid/lookup")
    }

    fn lookup<'a>(&'a self, _coords: &'a [Coordinate]) -> LookupFuture<'a> {
        Box::pin(async move {
            Err(ProfileError::ProviderResponse {
                provider: "down".to_string(),
                reason: "HTTP 500 Internal Server Error".to_string(),
            })
        })
    }
}

fn server_with(engine: ProfileEngine) -> TestServer {
    TestServer::new(router(Arc::new(AppState { engine }))).unwrap()
}

fn ramp_server() -> (TestServer, Arc<Ramp>) {
    let ramp = Arc::new(Ramp {
        calls: Mutex::new(Vec::new()),
    });
    let engine = ProfileEngine::builder()
        .provider(Arc::new(Down))
        .provider(ramp.clone())
        .max_sample_points(50)
        .build()
        .unwrap();
    (server_with(engine), ramp)
}

fn line(len: usize) -> Vec<[f64; 2]> {
    (0..len).map(|i| [-105.0, 40.0 + i as f64 * 0.001]).collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _) = ramp_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_profile_from_coordinates() {
    let (server, ramp) = ramp_server();

    let response = server
        .post("/profile")
        .json(&json!({ "coordinates": line(5) }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let samples = json["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0]["distance"], 0.0);
    assert_eq!(samples[4]["elevation"], 1040.0);
    assert_eq!(json["statistics"]["elevationGain"], 40.0);
    assert_eq!(json["statistics"]["elevationLoss"], 0.0);
    assert_eq!(json["statistics"]["numberOfPoints"], 5);

    // First provider failed, second one answered
    assert_eq!(*ramp.calls.lock().unwrap(), vec![5]);
}

#[tokio::test]
async fn test_profile_from_geojson_feature_is_sampled() {
    let (server, ramp) = ramp_server();

    let response = server
        .post("/profile")
        .json(&json!({
            "type": "Feature",
            "properties": { "GNIS_NAME": "Boulder Creek" },
            "geometry": { "type": "LineString", "coordinates": line(120) }
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["samples"].as_array().unwrap().len(), 60);
    assert_eq!(json["feature"]["geometry"]["type"], "LineString");
    assert_eq!(
        json["feature"]["geometry"]["coordinates"][1][2],
        json["samples"][1]["elevation"]
    );
    assert_eq!(*ramp.calls.lock().unwrap(), vec![60]);
}

#[tokio::test]
async fn test_profile_single_point_is_bad_request() {
    let (server, ramp) = ramp_server();

    let response = server
        .post("/profile")
        .json(&json!({ "coordinates": [[-105.0, 40.0]] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("at least 2"));
    assert!(ramp.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_polygon_is_bad_request() {
    let (server, _) = ramp_server();

    let response = server
        .post("/profile")
        .json(&json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_providers_down_is_bad_gateway() {
    let engine = ProfileEngine::builder()
        .provider(Arc::new(Down))
        .build()
        .unwrap();
    let server = server_with(engine);

    let response = server
        .post("/profile")
        .json(&json!({ "coordinates": line(3) }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"], PROVIDERS_UNAVAILABLE_MESSAGE);
    assert!(json.get("samples").is_none());
}

#[tokio::test]
async fn test_config_endpoint() {
    let (server, _) = ramp_server();

    let response = server.get("/config").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["maxSamplePoints"], 50);
    assert_eq!(json["interPointDelayMs"], 100);
    assert_eq!(json["providers"][0]["name"], "down");
    assert_eq!(json["providers"][0]["endpoint"], "http://down.invalid/lookup");
    assert_eq!(json["providers"][1]["name"], "ramp");
    assert!(json["providers"][1]["endpoint"].is_null());
}

#[tokio::test]
async fn test_openapi_document() {
    let (server, _) = ramp_server();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/profile"]["post"].is_object());
    assert!(json["paths"]["/config"]["get"].is_object());
}
