//! Error taxonomy. Every `Display` string is a sentence meant for the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a city name.")]
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported on this device.")]
    Unsupported,

    #[error("Location access denied. Please allow location access or search for a city manually.")]
    PermissionDenied,

    #[error("Location access denied. Location information is unavailable.")]
    PositionUnavailable,

    #[error("Location access denied. Location request timed out.")]
    Timeout,

    #[error("Location access denied. An unknown error occurred.")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No HTTP status was received (DNS, connect, reset).
    #[error("Network error. Please check your internet connection.")]
    Network,

    /// 404 on a name lookup.
    #[error("City not found. Please check the city name and try again.")]
    NotFound,

    #[error("Invalid API key. Please check your API key configuration.")]
    InvalidCredential,

    #[error("Failed to fetch weather data. Please try again later.")]
    ProviderUnavailable,

    #[error("Received an unexpected response from the weather service. Please try again later.")]
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Please configure your API key. Run `weather configure` to set it up.")]
    MissingCredential,
}

/// Anything a user action can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
