//! The three UI states and the fields of the weather card.

use crate::{config::DEFAULT_ICON_BASE_URL, model::WeatherReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Spinner,
    ErrorBanner,
    WeatherCard,
}

/// Text slots of the weather card. The icon is set separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CityName,
    Country,
    Temperature,
    Condition,
    FeelsLike,
    Humidity,
    WindSpeed,
}

impl Field {
    pub const fn all() -> &'static [Field] {
        &[
            Field::CityName,
            Field::Country,
            Field::Temperature,
            Field::Condition,
            Field::FeelsLike,
            Field::Humidity,
            Field::WindSpeed,
        ]
    }
}

/// Handles to the host's display elements.
pub trait Surface {
    fn set_visible(&mut self, region: Region, visible: bool);
    fn set_text(&mut self, field: Field, text: &str);
    fn set_error_text(&mut self, message: &str);
    fn set_icon(&mut self, src: &str, alt: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Error(String),
    Populated(WeatherReport),
}

/// Owns the surface; whichever `enter_*` ran last decides what is shown.
#[derive(Debug)]
pub struct Presenter<S> {
    surface: S,
    icon_base_url: String,
    state: Option<UiState>,
}

impl<S: Surface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_icon_base_url(surface, DEFAULT_ICON_BASE_URL)
    }

    pub fn with_icon_base_url(surface: S, icon_base_url: impl Into<String>) -> Self {
        Self {
            surface,
            icon_base_url: icon_base_url.into(),
            state: None,
        }
    }

    /// `None` until the first state is entered.
    pub fn state(&self) -> Option<&UiState> {
        self.state.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn enter_loading(&mut self) {
        self.show_only(Region::Spinner);
        self.state = Some(UiState::Loading);
    }

    pub fn enter_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.surface.set_error_text(&message);
        self.show_only(Region::ErrorBanner);
        self.state = Some(UiState::Error(message));
    }

    pub fn enter_populated(&mut self, report: WeatherReport) {
        for field in Field::all() {
            let text = field_text(&report, *field);
            self.surface.set_text(*field, &text);
        }
        let src = icon_url(&self.icon_base_url, &report.icon_code);
        self.surface.set_icon(&src, &report.description);

        self.show_only(Region::WeatherCard);
        self.state = Some(UiState::Populated(report));
    }

    fn show_only(&mut self, active: Region) {
        for region in [Region::Spinner, Region::ErrorBanner, Region::WeatherCard] {
            if region != active {
                self.surface.set_visible(region, false);
            }
        }
        self.surface.set_visible(active, true);
    }
}

pub fn field_text(report: &WeatherReport, field: Field) -> String {
    match field {
        Field::CityName => report.location_name.clone(),
        Field::Country => report.country.clone(),
        Field::Temperature => format!("{}°C", report.temperature_c),
        Field::Condition => report.description.clone(),
        Field::FeelsLike => format!("{}°C", report.feels_like_c),
        Field::Humidity => format!("{}%", report.humidity_pct),
        Field::WindSpeed => format!("{} m/s", report.wind_speed_mps),
    }
}

pub fn icon_url(icon_base_url: &str, icon_code: &str) -> String {
    format!("{icon_base_url}{icon_code}@2x.png")
}
