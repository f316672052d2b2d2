//! Profile result types and trail statistics.

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};
use crate::geodesy::{cumulative_distances, Coordinate};

/// One point of an elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationSample {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Elevation in meters.
    pub elevation: f64,
    /// Distance from the first sample along the sampled path, in meters.
    pub distance: f64,
    /// `distance` in kilometers.
    pub distance_km: f64,
}

impl ElevationSample {
    /// Create a sample; `distance_km` is derived from `distance_m`.
    pub fn new(coord: Coordinate, elevation: f64, distance_m: f64) -> Self {
        Self {
            lon: coord.lon,
            lat: coord.lat,
            elevation,
            distance: distance_m,
            distance_km: distance_m / 1000.0,
        }
    }

    /// Position of the sample.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat)
    }
}

/// Summary statistics over the samples of a profile.
///
/// Gain and loss are plain forward differences; provider noise shows up in
/// both totals unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatistics {
    /// Distance of the last sample, in meters.
    pub total_distance_meters: f64,
    /// Distance of the last sample, in kilometers.
    pub total_distance_km: f64,
    /// Lowest sampled elevation.
    pub min_elevation: f64,
    /// Highest sampled elevation.
    pub max_elevation: f64,
    /// Sum of all positive elevation steps.
    pub elevation_gain: f64,
    /// Sum of the magnitudes of all negative elevation steps.
    pub elevation_loss: f64,
    /// Number of samples.
    pub number_of_points: usize,
}

impl ProfileStatistics {
    /// Compute statistics for a sequence of samples.
    ///
    /// Returns the all-zero default for an empty slice.
    pub fn from_samples(samples: &[ElevationSample]) -> Self {
        let Some(last) = samples.last() else {
            return Self::default();
        };

        let mut min_elevation = f64::INFINITY;
        let mut max_elevation = f64::NEG_INFINITY;
        for s in samples {
            min_elevation = min_elevation.min(s.elevation);
            max_elevation = max_elevation.max(s.elevation);
        }

        let mut elevation_gain = 0.0;
        let mut elevation_loss = 0.0;
        for pair in samples.windows(2) {
            let diff = pair[1].elevation - pair[0].elevation;
            if diff > 0.0 {
                elevation_gain += diff;
            } else {
                elevation_loss -= diff;
            }
        }

        Self {
            total_distance_meters: last.distance,
            total_distance_km: last.distance_km,
            min_elevation,
            max_elevation,
            elevation_gain,
            elevation_loss,
            number_of_points: samples.len(),
        }
    }
}

/// Elevation profile of a path: ordered samples plus their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    /// Samples in path order.
    pub samples: Vec<ElevationSample>,
    /// Statistics over `samples`.
    pub statistics: ProfileStatistics,
}

impl ElevationProfile {
    /// Zip sampled coordinates with their elevations.
    ///
    /// Distances are measured along `coords` themselves, so they describe
    /// what was actually queried.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::LengthMismatch`] unless both slices have the
    /// same length.
    pub fn from_parts(coords: &[Coordinate], elevations: &[f64]) -> Result<Self> {
        if coords.len() != elevations.len() {
            return Err(ProfileError::LengthMismatch {
                coordinates: coords.len(),
                elevations: elevations.len(),
            });
        }

        let distances = cumulative_distances(coords);
        let samples: Vec<ElevationSample> = coords
            .iter()
            .zip(elevations)
            .zip(distances)
            .map(|((coord, &elevation), distance)| ElevationSample::new(*coord, elevation, distance))
            .collect();
        let statistics = ProfileStatistics::from_samples(&samples);

        Ok(Self {
            samples,
            statistics,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the profile has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
