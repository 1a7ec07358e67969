//! Turns user input or the device position into a [`Query`].

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{
    error::{LocationError, ValidationError},
    model::{Coordinates, Query},
};

/// How long the platform gets to produce a position fix.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: POSITION_TIMEOUT,
            high_accuracy: true,
        }
    }
}

/// Failure reported by a platform position service, using the W3C
/// geolocation error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<PositionError> for LocationError {
    fn from(err: PositionError) -> Self {
        match err.code {
            PositionError::PERMISSION_DENIED => LocationError::PermissionDenied,
            PositionError::POSITION_UNAVAILABLE => LocationError::PositionUnavailable,
            PositionError::TIMEOUT => LocationError::Timeout,
            _ => LocationError::Unknown,
        }
    }
}

/// A platform location service answering one-shot position requests.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, PositionError>;
}

/// Reports the same coordinates every time, e.g. a home location from config.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Locator {
    source: Option<Arc<dyn PositionSource>>,
    options: PositionOptions,
}

impl Locator {
    /// `None` means the platform has no location capability.
    pub fn new(source: Option<Arc<dyn PositionSource>>) -> Self {
        Self {
            source,
            options: PositionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn supports_location(&self) -> bool {
        self.source.is_some()
    }

    pub fn resolve_typed_query(raw_input: &str) -> Result<Query, ValidationError> {
        let name = raw_input.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        Ok(Query::ByName(name.to_string()))
    }

    /// Asks the platform for a single fix. No retry; a source that does not
    /// answer within the configured timeout yields [`LocationError::Timeout`].
    pub async fn resolve_device_location(&self) -> Result<Coordinates, LocationError> {
        let source = self.source.as_ref().ok_or(LocationError::Unsupported)?;

        tracing::debug!(
            timeout_ms = self.options.timeout.as_millis() as u64,
            high_accuracy = self.options.high_accuracy,
            "Requesting device position"
        );

        match tokio::time::timeout(self.options.timeout, source.current_position(&self.options))
            .await
        {
            Ok(Ok(coords)) => Ok(coords),
            Ok(Err(err)) => {
                tracing::debug!(code = err.code, message = %err.message, "Position request failed");
                Err(err.into())
            }
            Err(_) => Err(LocationError::Timeout),
        }
    }
}
