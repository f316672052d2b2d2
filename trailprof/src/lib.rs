//! # trailprof - Elevation profiles along a path
//!
//! Turns the polyline of a selected stream or trail into a distance-annotated
//! elevation profile with summary statistics, querying remote terrain
//! services for the elevations.
//!
//! ## Features
//!
//! - **Bounded**: Long polylines are decimated to a fixed number of query points
//! - **Resilient**: Elevation providers are tried in priority order until one succeeds
//! - **Polite**: Per-point providers are paced with a configurable delay
//! - **Stateless**: Each profile is computed fresh, nothing is cached between calls
//!
//! ## Quick Start
//!
//! ```ignore
//! use trailprof::{Coordinate, ProfileEngine};
//!
//! let engine = ProfileEngine::builder().build()?;
//!
//! let path = vec![
//!     Coordinate::new(-105.2705, 40.0150),
//!     Coordinate::new(-105.2650, 40.0190),
//!     Coordinate::new(-105.2600, 40.0230),
//! ];
//!
//! let profile = engine.get_profile(&path).await?;
//! println!(
//!     "{:.2} km, +{:.0} m / -{:.0} m",
//!     profile.statistics.total_distance_km,
//!     profile.statistics.elevation_gain,
//!     profile.statistics.elevation_loss,
//! );
//! ```
//!
//! ## Pipeline
//!
//! 1. [`sampling::sample`] keeps every `stride`-th coordinate, where
//!    `stride = max(1, len / max_points)`.
//! 2. Each provider in [`ProfileEngine`]'s priority list is asked for one
//!    elevation per sampled coordinate; the first success wins.
//! 3. [`geodesy::cumulative_distances`] annotates the sampled points and
//!    [`ProfileStatistics`] summarizes them.
//!
//! ## Data Sources
//!
//! - USGS 3DEP ImageServer `identify` (one request per point)
//! - Open-Elevation compatible batch lookup (one request per profile)

pub mod engine;
pub mod error;
pub mod geodesy;
pub mod profile;
pub mod provider;
pub mod sampling;
pub mod selection;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use engine::{ProfileEngine, ProfileEngineBuilder};
pub use error::{ProfileError, Result};
pub use geodesy::Coordinate;
pub use profile::{ElevationProfile, ElevationSample, ProfileStatistics};
pub use provider::{ElevationProvider, ProviderKind};
pub use selection::{RequestToken, SelectionTracker};
