//! Elevation profile engine with provider fallback.
//!
//! [`ProfileEngine`] ties the pipeline together: sample the path, ask each
//! provider in priority order for elevations, and turn the first complete
//! answer into an [`ElevationProfile`].
//!
//! ```ignore
//! use std::time::Duration;
//! use trailprof::{ProfileEngine, ProviderKind};
//!
//! let engine = ProfileEngine::builder()
//!     .max_sample_points(80)
//!     .inter_point_delay(Duration::from_millis(250))
//!     .provider_priority(vec![ProviderKind::OpenElevation, ProviderKind::ImageServer])
//!     .build()?;
//!
//! let profile = engine.get_profile(&path).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ProfileError, Result};
use crate::geodesy::{self, Coordinate};
use crate::profile::ElevationProfile;
use crate::provider::{
    BatchLookupProvider, ElevationProvider, ImageServerProvider, ProviderKind,
    DEFAULT_BATCH_LOOKUP_URL, DEFAULT_IMAGE_SERVER_URL,
};
use crate::sampling::{self, DEFAULT_MAX_POINTS};

/// Default pause between per-point provider requests.
pub const DEFAULT_INTER_POINT_DELAY: Duration = Duration::from_millis(100);

/// Default HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Computes elevation profiles from coordinate sequences.
///
/// The engine keeps no state between calls: every [`get_profile`] call
/// samples, queries and aggregates from scratch. It is `Send + Sync` and
/// can be shared behind an `Arc`.
///
/// [`get_profile`]: ProfileEngine::get_profile
pub struct ProfileEngine {
    providers: Vec<Arc<dyn ElevationProvider>>,
    max_sample_points: usize,
    inter_point_delay: Duration,
}

impl ProfileEngine {
    /// Create an engine over an explicit provider list, in priority order.
    ///
    /// Uses the default sampling bound of 50 points.
    pub fn new(providers: Vec<Arc<dyn ElevationProvider>>) -> Self {
        Self {
            providers,
            max_sample_points: DEFAULT_MAX_POINTS,
            inter_point_delay: DEFAULT_INTER_POINT_DELAY,
        }
    }

    /// Create a builder for the built-in HTTP providers.
    pub fn builder() -> ProfileEngineBuilder {
        ProfileEngineBuilder::new()
    }

    /// Upper bound on the number of points queried per profile.
    pub fn max_sample_points(&self) -> usize {
        self.max_sample_points
    }

    /// Pause between per-point requests.
    pub fn inter_point_delay(&self) -> Duration {
        self.inter_point_delay
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// `(name, endpoint)` of each provider, in the order they are tried.
    pub fn provider_endpoints(&self) -> Vec<(&str, Option<&str>)> {
        self.providers.iter().map(|p| (p.name(), p.endpoint())).collect()
    }

    /// Down-sample a path the way [`get_profile`](Self::get_profile) does.
    pub fn sample(&self, coords: &[Coordinate]) -> Vec<Coordinate> {
        sampling::sample(coords, self.max_sample_points)
    }

    /// Build the elevation profile of a path.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::Input`] if fewer than 2 coordinates are given; no
    ///   provider is contacted
    /// - [`ProfileError::InvalidCoordinate`] if a coordinate is not finite or
    ///   outside WGS84 bounds
    /// - [`ProfileError::NoProviders`] if the engine has no providers
    /// - [`ProfileError::AllProvidersFailed`] if every provider failed, with
    ///   the last failure attached
    pub async fn get_profile(&self, coords: &[Coordinate]) -> Result<ElevationProfile> {
        if coords.len() < 2 {
            return Err(ProfileError::Input {
                count: coords.len(),
            });
        }
        geodesy::validate_path(coords)?;
        if self.providers.is_empty() {
            return Err(ProfileError::NoProviders);
        }

        let sampled = self.sample(coords);
        tracing::debug!(
            input_points = coords.len(),
            sampled_points = sampled.len(),
            stride = sampling::stride(coords.len(), self.max_sample_points),
            "Sampled path"
        );

        let mut last_error = None;
        for provider in &self.providers {
            let name = provider.name();

            let outcome = match provider.lookup(&sampled).await {
                Ok(elevations) if elevations.len() == sampled.len() => Ok(elevations),
                Ok(elevations) => Err(ProfileError::response(
                    name,
                    format!(
                        "expected {} elevations, got {}",
                        sampled.len(),
                        elevations.len()
                    ),
                )),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(elevations) => {
                    tracing::info!(
                        provider = name,
                        points = sampled.len(),
                        "Elevation profile resolved"
                    );
                    return ElevationProfile::from_parts(&sampled, &elevations);
                }
                Err(e) => {
                    tracing::warn!(provider = name, error = %e, "Elevation provider failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => {
                tracing::error!(
                    attempted = self.providers.len(),
                    error = %last,
                    "All elevation providers failed"
                );
                Err(ProfileError::AllProvidersFailed {
                    attempted: self.providers.len(),
                    last: Box::new(last),
                })
            }
            None => Err(ProfileError::NoProviders),
        }
    }
}

/// Builder for [`ProfileEngine`].
///
/// # Example
///
/// ```ignore
/// use trailprof::ProfileEngineBuilder;
///
/// let engine = ProfileEngineBuilder::from_env()?
///     .image_server_token("abc123")
///     .build()?;
/// ```
pub struct ProfileEngineBuilder {
    max_sample_points: usize,
    inter_point_delay: Duration,
    provider_priority: Vec<ProviderKind>,
    image_server_url: String,
    image_server_token: Option<String>,
    batch_lookup_url: String,
    timeout_secs: u64,
    custom_providers: Vec<Arc<dyn ElevationProvider>>,
}

impl Default for ProfileEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileEngineBuilder {
    /// Create a builder with default settings.
    ///
    /// Defaults: 50 sample points, 100 ms pacing, USGS 3DEP ImageServer
    /// first and Open-Elevation as fallback, 30 s timeout.
    pub fn new() -> Self {
        Self {
            max_sample_points: DEFAULT_MAX_POINTS,
            inter_point_delay: DEFAULT_INTER_POINT_DELAY,
            provider_priority: vec![ProviderKind::ImageServer, ProviderKind::OpenElevation],
            image_server_url: DEFAULT_IMAGE_SERVER_URL.to_string(),
            image_server_token: None,
            batch_lookup_url: DEFAULT_BATCH_LOOKUP_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            custom_providers: Vec::new(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TRAILPROF_MAX_SAMPLE_POINTS` | Points queried per profile | 50 |
    /// | `TRAILPROF_INTER_POINT_DELAY_MS` | Pause between per-point requests | 100 |
    /// | `TRAILPROF_PROVIDERS` | Comma-separated provider priority | `image-server,open-elevation` |
    /// | `TRAILPROF_IMAGE_SERVER_URL` | ImageServer identify URL | USGS 3DEP |
    /// | `TRAILPROF_IMAGE_SERVER_TOKEN` | ArcGIS token | None |
    /// | `TRAILPROF_BATCH_URL` | Batch lookup URL | Open-Elevation |
    /// | `TRAILPROF_TIMEOUT_SECS` | HTTP request timeout | 30 |
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Config`] if a variable is set but cannot be
    /// parsed, or names an unknown provider.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();

        if let Some(n) = env_parse("TRAILPROF_MAX_SAMPLE_POINTS")? {
            builder.max_sample_points = n;
        }
        if let Some(ms) = env_parse("TRAILPROF_INTER_POINT_DELAY_MS")? {
            builder.inter_point_delay = Duration::from_millis(ms);
        }
        if let Ok(list) = std::env::var("TRAILPROF_PROVIDERS") {
            builder.provider_priority = ProviderKind::parse_list(&list)?;
        }
        if let Ok(url) = std::env::var("TRAILPROF_IMAGE_SERVER_URL") {
            builder.image_server_url = url;
        }
        if let Ok(token) = std::env::var("TRAILPROF_IMAGE_SERVER_TOKEN") {
            if !token.is_empty() {
                builder.image_server_token = Some(token);
            }
        }
        if let Ok(url) = std::env::var("TRAILPROF_BATCH_URL") {
            builder.batch_lookup_url = url;
        }
        if let Some(secs) = env_parse("TRAILPROF_TIMEOUT_SECS")? {
            builder.timeout_secs = secs;
        }

        Ok(builder)
    }

    /// Set the upper bound on points queried per profile. Must be at least 1.
    pub fn max_sample_points(mut self, max_points: usize) -> Self {
        self.max_sample_points = max_points;
        self
    }

    /// Set the pause between per-point requests.
    pub fn inter_point_delay(mut self, delay: Duration) -> Self {
        self.inter_point_delay = delay;
        self
    }

    /// Set which built-in providers are used, in priority order.
    pub fn provider_priority(mut self, priority: Vec<ProviderKind>) -> Self {
        self.provider_priority = priority;
        self
    }

    /// Set the ImageServer identify URL.
    pub fn image_server_url(mut self, url: impl Into<String>) -> Self {
        self.image_server_url = url.into();
        self
    }

    /// Set the ArcGIS token sent to the ImageServer.
    pub fn image_server_token(mut self, token: impl Into<String>) -> Self {
        self.image_server_token = Some(token.into());
        self
    }

    /// Set the batch lookup URL.
    pub fn batch_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.batch_lookup_url = url.into();
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Append a custom provider.
    ///
    /// Once any custom provider is added, the built-in priority list is
    /// ignored and only custom providers are used, in insertion order.
    pub fn provider(mut self, provider: Arc<dyn ElevationProvider>) -> Self {
        self.custom_providers.push(provider);
        self
    }

    /// Build the [`ProfileEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Config`] if `max_sample_points` is 0, no
    /// provider is left to ask, or the HTTP client cannot be created.
    pub fn build(self) -> Result<ProfileEngine> {
        if self.max_sample_points == 0 {
            return Err(ProfileError::config("max_sample_points must be at least 1"));
        }

        let providers = if self.custom_providers.is_empty() {
            self.builtin_providers()?
        } else {
            self.custom_providers
        };
        if providers.is_empty() {
            return Err(ProfileError::config("at least one elevation provider is required"));
        }

        Ok(ProfileEngine {
            providers,
            max_sample_points: self.max_sample_points,
            inter_point_delay: self.inter_point_delay,
        })
    }

    /// Instantiate the built-in providers, skipping repeated kinds.
    fn builtin_providers(&self) -> Result<Vec<Arc<dyn ElevationProvider>>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| ProfileError::config(format!("failed to create HTTP client: {}", e)))?;

        let mut seen = Vec::new();
        let mut providers: Vec<Arc<dyn ElevationProvider>> = Vec::new();
        for &kind in &self.provider_priority {
            if seen.contains(&kind) {
                continue;
            }
            seen.push(kind);

            providers.push(match kind {
                ProviderKind::ImageServer => Arc::new(self.image_server_provider(client.clone())),
                ProviderKind::OpenElevation => Arc::new(BatchLookupProvider::new(
                    client.clone(),
                    self.batch_lookup_url.clone(),
                )),
            });
        }
        Ok(providers)
    }

    fn image_server_provider(&self, client: Client) -> ImageServerProvider {
        ImageServerProvider::new(
            client,
            self.image_server_url.clone(),
            self.image_server_token.clone(),
            self.inter_point_delay,
        )
    }
}

/// Parse an optional environment variable.
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ProfileError::config(format!("{}={:?}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
