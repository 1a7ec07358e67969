use serde::{Deserialize, Serialize};

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the user asked for. Lives only as long as the request it drives.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    ByName(String),
    ByCoordinates(Coordinates),
}

/// Display-ready projection of a provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub country: String,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// Short label, e.g. "Clouds".
    pub condition: String,
    /// Long label, e.g. "overcast clouds".
    pub description: String,
    pub icon_code: String,
}

/// Rounds half toward positive infinity, so `20.5 -> 21` and `-0.5 -> 0`.
pub fn round_half_up(value: f64) -> i64 {
    // -0.0 casts to 0, so no negative zero reaches the display.
    (value + 0.5).floor() as i64
}
