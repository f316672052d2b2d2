//! Error types for the trailprof library.

use thiserror::Error;

/// Errors that can occur while building an elevation profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Too few coordinates to form a path.
    #[error("A profile needs at least 2 coordinates, got {count}")]
    Input { count: usize },

    /// A coordinate could not be read from the input geometry.
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// Coordinates and elevations do not pair up.
    #[error("Got {elevations} elevations for {coordinates} coordinates")]
    LengthMismatch { coordinates: usize, elevations: usize },

    /// HTTP transport failure while talking to a provider.
    #[error("{provider}: request failed: {source}")]
    ProviderTransport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered, but not with something usable.
    #[error("{provider}: {reason}")]
    ProviderResponse { provider: String, reason: String },

    /// Every configured provider failed.
    #[error("All {attempted} elevation provider(s) failed, last error: {last}")]
    AllProvidersFailed {
        attempted: usize,
        #[source]
        last: Box<ProfileError>,
    },

    /// The engine has no providers to ask.
    #[error("No elevation providers configured")]
    NoProviders,

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl ProfileError {
    pub(crate) fn transport(provider: impl Into<String>, source: reqwest::Error) -> Self {
        ProfileError::ProviderTransport {
            provider: provider.into(),
            source,
        }
    }

    pub(crate) fn response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        ProfileError::ProviderResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ProfileError::Config {
            message: message.into(),
        }
    }

    /// Whether the error is a single provider's failure that the engine
    /// recovers from by moving on to the next provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            ProfileError::ProviderTransport { .. } | ProfileError::ProviderResponse { .. }
        )
    }
}

/// Result type alias using [`ProfileError`].
pub type Result<T> = std::result::Result<T, ProfileError>;
