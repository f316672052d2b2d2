//! Great-circle distances on a spherical earth.
//!
//! All distances use the haversine formula with the mean earth radius. No
//! ellipsoid correction is applied; over the length of a stream the error is
//! well below the resolution of the elevation data.

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in decimal degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Create a coordinate from `(longitude, latitude)`.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both ordinates are finite and within WGS84 bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidCoordinate`] for NaN, infinite, or
    /// out-of-range values.
    pub fn validate(&self) -> Result<()> {
        let in_range = self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat);
        if in_range {
            Ok(())
        } else {
            Err(ProfileError::InvalidCoordinate {
                message: format!("out of range: lon={}, lat={}", self.lon, self.lat),
            })
        }
    }
}

/// Validate every coordinate of a path, reporting the first bad one.
pub fn validate_path(coords: &[Coordinate]) -> Result<()> {
    coords.iter().try_for_each(Coordinate::validate)
}

impl From<(f64, f64)> for Coordinate {
    /// Interprets the tuple as `(lon, lat)`, the GeoJSON order.
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Symmetric, zero for identical coordinates and never negative.
///
/// # Example
///
/// ```
/// use trailprof::geodesy::distance;
/// use trailprof::Coordinate;
///
/// let paris = Coordinate::new(2.3522, 48.8566);
/// let london = Coordinate::new(-0.1278, 51.5074);
/// let meters = distance(paris, london);
/// assert!((meters - 343_500.0).abs() < 2_000.0);
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points; NaN passes through
    let h = if h > 1.0 { 1.0 } else { h };
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_M * c
}

/// Running distance from the first coordinate, one entry per coordinate.
///
/// The first entry is always `0.0`; every following entry adds the distance
/// from its predecessor, so the result is non-decreasing. An empty input
/// gives an empty output.
pub fn cumulative_distances(coords: &[Coordinate]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(coords.len());
    let mut total = 0.0;

    for (i, coord) in coords.iter().enumerate() {
        if i > 0 {
            total += distance(coords[i - 1], *coord);
        }
        distances.push(total);
    }

    distances
}
