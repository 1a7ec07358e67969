//! Core library for the weather lookup widget.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The lookup cycle: locate, fetch, present
//! - Shared domain models (queries, reports)
//!
//! It is host-agnostic: a host supplies a [`Surface`] to draw on and,
//! optionally, a [`PositionSource`] for device location. `weather-widget-cli`
//! is the terminal host.

pub mod client;
pub mod config;
pub mod error;
pub mod locator;
pub mod model;
pub mod presenter;
pub mod widget;

pub use client::WeatherClient;
pub use config::{Config, LocationConfig};
pub use error::{ActionError, ConfigError, FetchError, LocationError, ValidationError};
pub use locator::{FixedPosition, Locator, PositionError, PositionOptions, PositionSource};
pub use model::{Coordinates, Query, WeatherReport};
pub use presenter::{Field, Presenter, Region, Surface, UiState};
pub use widget::{Key, Widget};
