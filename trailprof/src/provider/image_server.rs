//! ArcGIS ImageServer `identify` provider.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::{pace_points, ElevationProvider, LookupFuture, ProviderKind};
use crate::error::{ProfileError, Result};
use crate::geodesy::Coordinate;

/// USGS 3DEP elevation ImageServer identify endpoint.
pub const DEFAULT_IMAGE_SERVER_URL: &str =
    "https://elevation.nationalmap.gov/arcgis/rest/services/3DEPElevation/ImageServer/identify";

/// Elevation reading extracted from an identify response.
///
/// ImageServer deployments answer in a few different shapes. They are
/// tried in this order and the first match wins:
///
/// 1. a numeric top-level `value`
/// 2. `catalogItems.features[0].attributes.Pixel_Value`
/// 3. `name == "Pixel"` with a space-delimited string `value`, first token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdentifyReading {
    /// Numeric `value` field.
    Value(f64),
    /// Pixel value of the first catalog item.
    CatalogPixel(f64),
    /// First token of a `"Pixel"` string value, e.g. `"1624.5 0"`.
    PixelText(f64),
    /// No recognizable elevation field (e.g. `"NoData"`).
    Unrecognized,
}

impl IdentifyReading {
    /// Classify an identify response body.
    pub fn parse(body: &Value) -> Self {
        if let Some(v) = body.get("value").and_then(Value::as_f64) {
            return IdentifyReading::Value(v);
        }

        if let Some(v) = body
            .pointer("/catalogItems/features/0/attributes/Pixel_Value")
            .and_then(number_or_numeric_text)
        {
            return IdentifyReading::CatalogPixel(v);
        }

        if body.get("name").and_then(Value::as_str) == Some("Pixel") {
            if let Some(v) = body
                .get("value")
                .and_then(Value::as_str)
                .and_then(|text| text.split_whitespace().next())
                .and_then(|token| token.parse::<f64>().ok())
            {
                return IdentifyReading::PixelText(v);
            }
        }

        IdentifyReading::Unrecognized
    }

    /// Elevation in meters; unrecognized readings count as `0.0`.
    pub fn elevation(&self) -> f64 {
        match *self {
            IdentifyReading::Value(v)
            | IdentifyReading::CatalogPixel(v)
            | IdentifyReading::PixelText(v) => v,
            IdentifyReading::Unrecognized => 0.0,
        }
    }
}

fn number_or_numeric_text(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Per-point provider backed by an ImageServer `identify` endpoint.
///
/// Each coordinate is a separate GET request with a WGS84 point geometry
/// and bilinear resampling. Consecutive requests are spaced by `delay` so a
/// public endpoint is not hammered. A point that fails gets `0.0`; the
/// attempt only fails when no point succeeded.
pub struct ImageServerProvider {
    client: Client,
    url: String,
    token: Option<String>,
    delay: Duration,
}

impl ImageServerProvider {
    /// Create a provider.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (its timeout applies to every point)
    /// * `url` - Full `.../ImageServer/identify` URL
    /// * `token` - Optional ArcGIS access token
    /// * `delay` - Pause between consecutive point requests
    pub fn new(
        client: Client,
        url: impl Into<String>,
        token: Option<String>,
        delay: Duration,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            token,
            delay,
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pause between point requests.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Query parameters for one point.
    fn query_params(&self, coord: Coordinate) -> Vec<(&'static str, String)> {
        let geometry = serde_json::json!({
            "x": coord.lon,
            "y": coord.lat,
            "spatialReference": { "wkid": 4326 },
        });

        let mut params = vec![
            ("geometry", geometry.to_string()),
            ("geometryType", "esriGeometryPoint".to_string()),
            ("returnGeometry", "false".to_string()),
            ("returnCatalogItems", "true".to_string()),
            ("interpolation", "RSP_BilinearInterpolation".to_string()),
            ("f", "json".to_string()),
        ];
        if let Some(token) = &self.token {
            params.push(("token", token.clone()));
        }
        params
    }

    async fn query_point(&self, coord: Coordinate) -> Result<f64> {
        let name = self.name();

        let response = self
            .client
            .get(&self.url)
            .query(&self.query_params(coord))
            .send()
            .await
            .map_err(|e| ProfileError::transport(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::response(name, format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProfileError::response(name, format!("invalid JSON body: {}", e)))?;

        let reading = IdentifyReading::parse(&body);
        if reading == IdentifyReading::Unrecognized {
            tracing::debug!(
                provider = name,
                lon = coord.lon,
                lat = coord.lat,
                "No elevation field in identify response, using 0"
            );
        }
        Ok(reading.elevation())
    }
}

impl ElevationProvider for ImageServerProvider {
    fn name(&self) -> &str {
        ProviderKind::ImageServer.id()
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn lookup<'a>(&'a self, coords: &'a [Coordinate]) -> LookupFuture<'a> {
        Box::pin(pace_points(self.name(), coords, self.delay, move |coord| {
            self.query_point(coord)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_value() {
        let body = json!({ "value": 1624.5, "name": "Pixel" });
        assert_eq!(IdentifyReading::parse(&body), IdentifyReading::Value(1624.5));
    }

    #[test]
    fn test_parse_catalog_pixel_value() {
        let body = json!({
            "value": "NoData",
            "catalogItems": {
                "features": [
                    { "attributes": { "Pixel_Value": 2011.25 } },
                    { "attributes": { "Pixel_Value": 9999.0 } }
                ]
            }
        });
        assert_eq!(
            IdentifyReading::parse(&body),
            IdentifyReading::CatalogPixel(2011.25)
        );

        let body = json!({
            "catalogItems": { "features": [ { "attributes": { "Pixel_Value": "87.5" } } ] }
        });
        assert_eq!(
            IdentifyReading::parse(&body),
            IdentifyReading::CatalogPixel(87.5)
        );
    }

    #[test]
    fn test_parse_pixel_text() {
        let body = json!({ "name": "Pixel", "value": "1587.3 12 7" });
        assert_eq!(
            IdentifyReading::parse(&body),
            IdentifyReading::PixelText(1587.3)
        );
    }

    #[test]
    fn test_parse_precedence() {
        // Numeric value beats catalog items
        let body = json!({
            "value": 10.0,
            "catalogItems": { "features": [ { "attributes": { "Pixel_Value": 20.0 } } ] }
        });
        assert_eq!(IdentifyReading::parse(&body), IdentifyReading::Value(10.0));

        // Catalog items beat pixel text
        let body = json!({
            "name": "Pixel",
            "value": "30.0",
            "catalogItems": { "features": [ { "attributes": { "Pixel_Value": 20.0 } } ] }
        });
        assert_eq!(
            IdentifyReading::parse(&body),
            IdentifyReading::CatalogPixel(20.0)
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        let bodies = [
            json!({}),
            json!({ "name": "Pixel", "value": "NoData" }),
            json!({ "name": "Other", "value": "12.0" }),
            json!({ "catalogItems": { "features": [] } }),
            json!({ "error": { "code": 498, "message": "Invalid Token" } }),
        ];
        for body in bodies {
            let reading = IdentifyReading::parse(&body);
            assert_eq!(reading, IdentifyReading::Unrecognized, "{body}");
            assert_eq!(reading.elevation(), 0.0);
        }
    }

    #[test]
    fn test_query_params() {
        let provider = ImageServerProvider::new(
            Client::new(),
            DEFAULT_IMAGE_SERVER_URL,
            Some("secret".to_string()),
            Duration::from_millis(100),
        );
        let params = provider.query_params(Coordinate::new(-105.27, 40.01));

        let geometry = &params.iter().find(|(k, _)| *k == "geometry").unwrap().1;
        let geometry: Value = serde_json::from_str(geometry).unwrap();
        assert_eq!(geometry["x"], -105.27);
        assert_eq!(geometry["y"], 40.01);
        assert_eq!(geometry["spatialReference"]["wkid"], 4326);

        assert!(params.contains(&("interpolation", "RSP_BilinearInterpolation".to_string())));
        assert!(params.contains(&("f", "json".to_string())));
        assert!(params.contains(&("token", "secret".to_string())));
    }

    #[test]
    fn test_query_params_without_token() {
        let provider =
            ImageServerProvider::new(Client::new(), "http://localhost/identify", None, Duration::ZERO);
        let params = provider.query_params(Coordinate::new(0.0, 0.0));
        assert!(params.iter().all(|(k, _)| *k != "token"));
    }
}
