//! Open-Elevation style batch lookup provider.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ElevationProvider, LookupFuture, ProviderKind};
use crate::error::{ProfileError, Result};
use crate::geodesy::Coordinate;

/// Public Open-Elevation lookup endpoint.
pub const DEFAULT_BATCH_LOOKUP_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

#[derive(Debug, Serialize)]
struct LookupRequest {
    locations: Vec<LookupLocation>,
}

#[derive(Debug, Serialize)]
struct LookupLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Option<Vec<LookupResult>>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: Option<f64>,
}

/// Provider that resolves a whole path with a single POST.
///
/// Request body: `{"locations": [{"latitude": .., "longitude": ..}, ..]}`.
/// Response body: `{"results": [{"elevation": ..}, ..]}` in request order.
pub struct BatchLookupProvider {
    client: Client,
    url: String,
}

impl BatchLookupProvider {
    /// Create a provider for the given lookup URL.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn query(&self, coords: &[Coordinate]) -> Result<Vec<f64>> {
        let name = self.name();
        let request = LookupRequest {
            locations: coords
                .iter()
                .map(|c| LookupLocation {
                    latitude: c.lat,
                    longitude: c.lon,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProfileError::transport(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::response(name, format!("HTTP {}", status)));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| ProfileError::response(name, format!("invalid JSON body: {}", e)))?;

        elevations_from_results(name, body, coords.len())
    }
}

/// Check a decoded response against the request and pull out elevations.
fn elevations_from_results(name: &str, body: LookupResponse, expected: usize) -> Result<Vec<f64>> {
    let results = body
        .results
        .ok_or_else(|| ProfileError::response(name, "response has no 'results' field"))?;

    if results.is_empty() {
        return Err(ProfileError::response(name, "empty results"));
    }
    if results.len() != expected {
        return Err(ProfileError::response(
            name,
            format!("expected {} results, got {}", expected, results.len()),
        ));
    }

    results
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            r.elevation
                .ok_or_else(|| ProfileError::response(name, format!("result {} has no elevation", i)))
        })
        .collect()
}

impl ElevationProvider for BatchLookupProvider {
    fn name(&self) -> &str {
        ProviderKind::OpenElevation.id()
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn lookup<'a>(&'a self, coords: &'a [Coordinate]) -> LookupFuture<'a> {
        Box::pin(self.query(coords))
    }
}
