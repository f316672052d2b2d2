//! GeoJSON input and output.
//!
//! Enable the `geojson` feature to use this module.
//!
//! On the way in, a selected map feature is reduced to the coordinate list
//! of its line: a `LineString` as-is, a `MultiLineString` by its first part.
//! On the way out, a profile becomes a `LineString` feature whose positions
//! carry elevation as the Z value and whose properties hold the statistics.
//!
//! # Example
//!
//! ```ignore
//! use trailprof::geojson::coordinates_from_geojson;
//! use geojson::GeoJson;
//!
//! let feature: GeoJson = r#"{
//!     "type": "Feature",
//!     "properties": { "name": "Boulder Creek" },
//!     "geometry": { "type": "LineString", "coordinates": [[-105.27, 40.01], [-105.26, 40.02]] }
//! }"#.parse()?;
//!
//! let path = coordinates_from_geojson(&feature)?.expect("not a line");
//! let profile = engine.get_profile(&path).await?;
//! ```

use geojson::{Feature, GeoJson, Geometry, JsonObject, Value as GeoJsonValue};

use crate::error::{ProfileError, Result};
use crate::geodesy::Coordinate;
use crate::profile::ElevationProfile;

/// Extract the path of a line geometry.
///
/// Returns `Ok(None)` for geometries that are not lines (points, polygons).
/// A `MultiLineString` contributes only its first part; a
/// `GeometryCollection` its first line member.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidCoordinate`] if a position has fewer than
/// two elements.
pub fn coordinates_from_geometry(geometry: &Geometry) -> Result<Option<Vec<Coordinate>>> {
    match &geometry.value {
        GeoJsonValue::LineString(positions) => positions_to_coordinates(positions).map(Some),
        GeoJsonValue::MultiLineString(lines) => match lines.first() {
            Some(first) => positions_to_coordinates(first).map(Some),
            None => Ok(None),
        },
        GeoJsonValue::GeometryCollection(geometries) => {
            for g in geometries {
                if let Some(coords) = coordinates_from_geometry(g)? {
                    return Ok(Some(coords));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Extract the path from any GeoJSON object.
///
/// For a `FeatureCollection` the first feature with a line geometry is used.
pub fn coordinates_from_geojson(geojson: &GeoJson) -> Result<Option<Vec<Coordinate>>> {
    match geojson {
        GeoJson::Geometry(geometry) => coordinates_from_geometry(geometry),
        GeoJson::Feature(feature) => coordinates_from_feature(feature),
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(coords) = coordinates_from_feature(feature)? {
                    return Ok(Some(coords));
                }
            }
            Ok(None)
        }
    }
}

fn coordinates_from_feature(feature: &Feature) -> Result<Option<Vec<Coordinate>>> {
    match &feature.geometry {
        Some(geometry) => coordinates_from_geometry(geometry),
        None => Ok(None),
    }
}

fn positions_to_coordinates(positions: &[Vec<f64>]) -> Result<Vec<Coordinate>> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lon, *lat)),
            _ => Err(ProfileError::InvalidCoordinate {
                message: "Coordinate must have at least 2 elements (lon, lat)".to_string(),
            }),
        })
        .collect()
}

/// Convert a profile into a GeoJSON `LineString` feature.
///
/// Positions are `[lon, lat, elevation]`. Properties carry the statistics
/// under their camelCase names plus a `distances` array in meters.
pub fn profile_to_feature(profile: &ElevationProfile) -> Feature {
    let positions: Vec<Vec<f64>> = profile
        .samples
        .iter()
        .map(|s| vec![s.lon, s.lat, s.elevation])
        .collect();

    let mut properties = match serde_json::to_value(profile.statistics) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonObject::new(),
    };
    properties.insert(
        "distances".to_string(),
        profile.samples.iter().map(|s| s.distance).collect(),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::LineString(positions))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
