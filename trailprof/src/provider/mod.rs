//! Elevation data providers.
//!
//! Every provider answers the same question: one elevation per coordinate,
//! in order. The [`ProfileEngine`](crate::ProfileEngine) asks them in
//! priority order and keeps the first complete answer.
//!
//! # Built-in Providers
//!
//! - [`ImageServerProvider`]: ArcGIS ImageServer `identify`, one GET per
//!   point, defaulting to the USGS 3DEP elevation service. Points are paced
//!   by a fixed delay.
//! - [`BatchLookupProvider`]: Open-Elevation style batch lookup, a single
//!   POST for the whole path.
//!
//! Other sources can be plugged in by implementing [`ElevationProvider`].

mod batch;
mod image_server;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ProfileError, Result};
use crate::geodesy::Coordinate;

pub use batch::{BatchLookupProvider, DEFAULT_BATCH_LOOKUP_URL};
pub use image_server::{IdentifyReading, ImageServerProvider, DEFAULT_IMAGE_SERVER_URL};

/// Future returned by [`ElevationProvider::lookup`].
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f64>>> + Send + 'a>>;

/// A source of elevation values.
///
/// # Example
///
/// ```
/// use trailprof::provider::{ElevationProvider, LookupFuture};
/// use trailprof::Coordinate;
///
/// struct SeaLevel;
///
/// impl ElevationProvider for SeaLevel {
///     fn name(&self) -> &str {
///         "sea-level"
///     }
///
///     fn lookup<'a>(&'a self, coords: &'a [Coordinate]) -> LookupFuture<'a> {
///         Box::pin(async move { Ok(vec![0.0; coords.len()]) })
///     }
/// }
/// ```
pub trait ElevationProvider: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Remote endpoint, if the provider has one.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    /// Look up one elevation (meters) per coordinate, in the same order.
    ///
    /// An `Err` means the whole attempt failed and the next provider should
    /// be asked.
    fn lookup<'a>(&'a self, coords: &'a [Coordinate]) -> LookupFuture<'a>;
}

/// Identifiers of the built-in providers, used in priority lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// ArcGIS ImageServer identify, one request per point.
    ImageServer,
    /// Open-Elevation batch lookup.
    OpenElevation,
}

impl ProviderKind {
    /// Canonical identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::ImageServer => "image-server",
            ProviderKind::OpenElevation => "open-elevation",
        }
    }

    /// Parse a comma-separated priority list such as `"3dep,open-elevation"`.
    ///
    /// Blank entries are skipped.
    pub fn parse_list(value: &str) -> Result<Vec<ProviderKind>> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "image-server" | "imageserver" | "3dep" | "usgs" => Ok(ProviderKind::ImageServer),
            "open-elevation" | "openelevation" | "batch" => Ok(ProviderKind::OpenElevation),
            other => Err(ProfileError::config(format!(
                "unknown elevation provider '{}' (expected image-server or open-elevation)",
                other
            ))),
        }
    }
}

/// Query points one at a time with a fixed pause between them.
///
/// A failed point gets an elevation of `0.0` and the loop carries on. Only
/// when every point failed is the last error returned, so that the caller
/// can fall back to another provider.
pub(crate) async fn pace_points<F, Fut>(
    provider: &str,
    coords: &[Coordinate],
    delay: Duration,
    mut query: F,
) -> Result<Vec<f64>>
where
    F: FnMut(Coordinate) -> Fut,
    Fut: Future<Output = Result<f64>>,
{
    let mut elevations = Vec::with_capacity(coords.len());
    let mut failed = 0;
    let mut last_error = None;

    for (i, coord) in coords.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match query(*coord).await {
            Ok(elevation) => elevations.push(elevation),
            Err(e) => {
                tracing::debug!(
                    provider,
                    index = i,
                    lon = coord.lon,
                    lat = coord.lat,
                    error = %e,
                    "Point lookup failed, using 0"
                );
                failed += 1;
                last_error = Some(e);
                elevations.push(0.0);
            }
        }
    }

    match last_error {
        Some(e) if failed == coords.len() => Err(e),
        _ => Ok(elevations),
    }
}
