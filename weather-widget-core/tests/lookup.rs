use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::json;
use weather_widget_core::{
    ActionError, Config, Coordinates, FetchError, Field, LocationConfig, LocationError, Locator,
    PositionError, PositionOptions, PositionSource, Presenter, Region, Surface, UiState,
    WeatherClient, Widget,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Default)]
struct CardSurface {
    visible: Vec<Region>,
    texts: HashMap<Field, String>,
    error: Option<String>,
    icon: Option<String>,
}

impl Surface for CardSurface {
    fn set_visible(&mut self, region: Region, visible: bool) {
        self.visible.retain(|r| *r != region);
        if visible {
            self.visible.push(region);
        }
    }

    fn set_text(&mut self, field: Field, text: &str) {
        self.texts.insert(field, text.to_string());
    }

    fn set_error_text(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn set_icon(&mut self, src: &str, _alt: &str) {
        self.icon = Some(src.to_string());
    }
}

#[derive(Debug)]
struct DeniedPosition;

#[async_trait]
impl PositionSource for DeniedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, PositionError> {
        Err(PositionError::new(
            PositionError::PERMISSION_DENIED,
            "User denied Geolocation",
        ))
    }
}

fn paris_body() -> serde_json::Value {
    json!({
        "name": "Paris",
        "sys": {"country": "FR"},
        "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60},
        "wind": {"speed": 3.1},
        "weather": [{"main": "Clouds", "description": "overcast clouds", "icon": "04d"}]
    })
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.set_api_key("TEST_KEY");
    config.base_url = format!("{}{WEATHER_PATH}", server.uri());
    config
}

async fn respond_with(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn paris_search_populates_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("  Paris ");
    widget.handle_search().await.expect("lookup succeeds");

    let surface = widget.presenter().surface();
    assert_eq!(surface.visible, vec![Region::WeatherCard]);
    assert_eq!(surface.texts[&Field::CityName], "Paris");
    assert_eq!(surface.texts[&Field::Country], "FR");
    assert_eq!(surface.texts[&Field::Temperature], "18°C");
    assert_eq!(surface.texts[&Field::Condition], "overcast clouds");
    assert_eq!(surface.texts[&Field::FeelsLike], "18°C");
    assert_eq!(surface.texts[&Field::Humidity], "60%");
    assert_eq!(surface.texts[&Field::WindSpeed], "3.1 m/s");
    assert!(surface.icon.as_deref().is_some_and(|src| src.ends_with("04d@2x.png")));

    assert_eq!(widget.input(), "");
}

#[tokio::test]
async fn temperature_is_rounded_for_display() {
    let server = MockServer::start().await;
    let mut body = paris_body();
    body["main"]["temp"] = json!(20.6);
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("Paris");
    widget.handle_search().await.expect("lookup succeeds");

    assert_eq!(widget.presenter().surface().texts[&Field::Temperature], "21°C");
}

#[tokio::test]
async fn city_names_are_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "São Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherClient::with_base_url("TEST_KEY", format!("{}{WEATHER_PATH}", server.uri()));
    client.fetch_by_name("São Paulo").await.expect("lookup succeeds");
}

#[tokio::test]
async fn unknown_city_shows_not_found() {
    let server = MockServer::start().await;
    respond_with(&server, 404).await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("Atlantis");
    let err = widget.handle_search().await.unwrap_err();

    assert_eq!(err, ActionError::Fetch(FetchError::NotFound));
    let surface = widget.presenter().surface();
    assert_eq!(surface.visible, vec![Region::ErrorBanner]);
    assert_eq!(
        surface.error.as_deref(),
        Some("City not found. Please check the city name and try again.")
    );
    assert_eq!(widget.input(), "Atlantis");
}

#[tokio::test]
async fn status_codes_are_classified() {
    let cases = [
        (401, FetchError::InvalidCredential),
        (404, FetchError::NotFound),
        (429, FetchError::ProviderUnavailable),
        (500, FetchError::ProviderUnavailable),
        (503, FetchError::ProviderUnavailable),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        respond_with(&server, status).await;

        let client =
            WeatherClient::with_base_url("TEST_KEY", format!("{}{WEATHER_PATH}", server.uri()));
        assert_eq!(client.fetch_by_name("Paris").await, Err(expected), "status {status}");
    }
}

#[tokio::test]
async fn coordinate_lookup_does_not_report_not_found() {
    let server = MockServer::start().await;
    respond_with(&server, 404).await;

    let client = WeatherClient::with_base_url("TEST_KEY", format!("{}{WEATHER_PATH}", server.uri()));
    let coords = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };
    assert_eq!(
        client.fetch_by_coordinates(coords).await,
        Err(FetchError::ProviderUnavailable)
    );
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    // Bind then drop to get a port with nothing listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr");

    let client = WeatherClient::with_base_url("TEST_KEY", format!("http://{addr}{WEATHER_PATH}"));
    assert_eq!(client.fetch_by_name("Paris").await, Err(FetchError::Network));
}

#[tokio::test]
async fn success_with_unexpected_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200, "weather": []})))
        .mount(&server)
        .await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("Paris");
    let err = widget.handle_search().await.unwrap_err();

    assert_eq!(err, ActionError::Fetch(FetchError::MalformedResponse));
    assert_eq!(widget.presenter().surface().visible, vec![Region::ErrorBanner]);
}

#[tokio::test]
async fn configured_location_is_looked_up_by_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("lat", "48.8566"))
        .and(query_param("lon", "2.3522"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.set_location(Some(LocationConfig {
        latitude: 48.8566,
        longitude: 2.3522,
    }));

    let mut widget = Widget::from_config(&config, CardSurface::default());
    widget.handle_location().await.expect("lookup succeeds");

    assert!(matches!(
        widget.presenter().state(),
        Some(UiState::Populated(report)) if report.location_name == "Paris"
    ));
}

#[tokio::test]
async fn denied_location_shows_message_and_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = WeatherClient::with_base_url("TEST_KEY", format!("{}{WEATHER_PATH}", server.uri()));
    let locator = Locator::new(Some(Arc::new(DeniedPosition)));
    let mut widget = Widget::new(Some(client), locator, Presenter::new(CardSurface::default()));

    let err = widget.handle_location().await.unwrap_err();

    assert_eq!(err, ActionError::Location(LocationError::PermissionDenied));
    let message = widget.presenter().surface().error.clone().unwrap_or_default();
    assert!(message.contains("Location access denied."));
}

#[tokio::test]
async fn empty_input_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(0)
        .mount(&server)
        .await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("");
    widget.handle_search().await.unwrap_err();

    assert_eq!(
        widget.presenter().surface().error.as_deref(),
        Some("Please enter a city name.")
    );
}

#[tokio::test]
async fn later_success_replaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .mount(&server)
        .await;

    let mut widget = Widget::from_config(&config_for(&server), CardSurface::default());
    widget.set_input("Atlantis");
    widget.handle_search().await.unwrap_err();

    widget.set_input("Paris");
    widget.handle_search().await.expect("lookup succeeds");

    assert_eq!(widget.presenter().surface().visible, vec![Region::WeatherCard]);
}
