use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::DEFAULT_BASE_URL,
    error::FetchError,
    model::{Coordinates, Query, WeatherReport, round_half_up},
};

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<WeatherReport, FetchError> {
        self.fetch(&Query::ByName(name.to_string())).await
    }

    pub async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReport, FetchError> {
        self.fetch(&Query::ByCoordinates(coords)).await
    }

    /// One GET, no retry, no timeout.
    pub async fn fetch(&self, query: &Query) -> Result<WeatherReport, FetchError> {
        let mut params: Vec<(&str, String)> = match query {
            Query::ByName(name) => vec![("q", name.clone())],
            Query::ByCoordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(kind = query_kind(query), "Sending current weather request");

        let res = self
            .http
            .get(self.base_url.as_str())
            .query(&params)
            .send()
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "Weather request did not complete");
                FetchError::Network
            })?;

        let status = res.status();
        tracing::debug!(status = status.as_u16(), "Weather response received");

        if let Some(err) = classify_status(status, query) {
            return Err(err);
        }

        let body = res.text().await.map_err(|err| {
            tracing::debug!(error = %err, "Failed to read weather response body");
            FetchError::MalformedResponse
        })?;

        parse_report(&body)
    }
}

fn query_kind(query: &Query) -> &'static str {
    match query {
        Query::ByName(_) => "name",
        Query::ByCoordinates(_) => "coordinates",
    }
}

/// `None` for success. A 404 only means "city not found" for name lookups.
fn classify_status(status: StatusCode, query: &Query) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }

    let err = match status {
        StatusCode::NOT_FOUND if matches!(query, Query::ByName(_)) => FetchError::NotFound,
        StatusCode::UNAUTHORIZED => FetchError::InvalidCredential,
        _ => FetchError::ProviderUnavailable,
    };
    Some(err)
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn parse_report(body: &str) -> Result<WeatherReport, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|err| {
        tracing::debug!(error = %err, "Failed to parse current weather JSON");
        FetchError::MalformedResponse
    })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(FetchError::MalformedResponse)?;

    Ok(WeatherReport {
        location_name: parsed.name,
        country: parsed.sys.country,
        temperature_c: round_half_up(parsed.main.temp),
        feels_like_c: round_half_up(parsed.main.feels_like),
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        condition: condition.main,
        description: condition.description,
        icon_code: condition.icon,
    })
}
