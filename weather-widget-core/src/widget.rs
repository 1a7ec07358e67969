//! User actions: locate, fetch, present.
//!
//! Every failure ends up in the error banner here. Handlers also hand the
//! error back so a one-shot host can pick an exit status. Handlers take
//! `&mut self`, so one widget never has two lookups in flight; nothing is
//! cancelled or de-duplicated beyond that.

use std::sync::Arc;

use crate::{
    client::WeatherClient,
    config::Config,
    error::{ActionError, ConfigError},
    locator::{FixedPosition, Locator, PositionSource},
    model::{Query, WeatherReport},
    presenter::{Presenter, Surface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

#[derive(Debug)]
pub struct Widget<S> {
    /// `None` while the credential is missing.
    client: Option<WeatherClient>,
    locator: Locator,
    presenter: Presenter<S>,
    input: String,
}

impl<S: Surface> Widget<S> {
    /// Builds the widget from config. A configured `[location]` becomes the
    /// device position; otherwise location lookups are unsupported.
    pub fn from_config(config: &Config, surface: S) -> Self {
        let client = config
            .credential()
            .ok()
            .map(|key| WeatherClient::with_base_url(key, config.base_url.as_str()));

        let source = config
            .location
            .map(|loc| Arc::new(FixedPosition(loc.into())) as Arc<dyn PositionSource>);

        Self::new(
            client,
            Locator::new(source),
            Presenter::with_icon_base_url(surface, config.icon_base_url.as_str()),
        )
    }

    pub fn new(client: Option<WeatherClient>, locator: Locator, presenter: Presenter<S>) -> Self {
        Self {
            client,
            locator,
            presenter,
            input: String::new(),
        }
    }

    pub fn presenter(&self) -> &Presenter<S> {
        &self.presenter
    }

    pub fn into_presenter(self) -> Presenter<S> {
        self.presenter
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Shows the configuration error right away when there is no API key.
    pub fn startup(&mut self) -> Result<(), ActionError> {
        if self.client.is_none() {
            let err = ActionError::from(ConfigError::MissingCredential);
            self.presenter.enter_error(err.to_string());
            return Err(err);
        }
        Ok(())
    }

    /// Looks up the city in the input buffer; clears the buffer on success.
    pub async fn handle_search(&mut self) -> Result<(), ActionError> {
        let outcome = self.search().await;
        if outcome.is_ok() {
            self.input.clear();
        }
        self.present(outcome)
    }

    pub async fn handle_location(&mut self) -> Result<(), ActionError> {
        let outcome = self.locate().await;
        self.present(outcome)
    }

    /// Edits the input buffer; `Enter` submits it like the search trigger.
    pub async fn handle_key(&mut self, key: Key) -> Result<(), ActionError> {
        match key {
            Key::Enter => return self.handle_search().await,
            Key::Backspace => {
                self.input.pop();
            }
            Key::Char(c) => self.input.push(c),
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<WeatherReport, ActionError> {
        let query = Locator::resolve_typed_query(&self.input)?;
        let client = self
            .client
            .as_ref()
            .ok_or(ConfigError::MissingCredential)?;

        self.presenter.enter_loading();
        Ok(client.fetch(&query).await?)
    }

    async fn locate(&mut self) -> Result<WeatherReport, ActionError> {
        let client = self
            .client
            .as_ref()
            .ok_or(ConfigError::MissingCredential)?;

        self.presenter.enter_loading();
        let coords = self.locator.resolve_device_location().await?;
        Ok(client.fetch(&Query::ByCoordinates(coords)).await?)
    }

    fn present(&mut self, outcome: Result<WeatherReport, ActionError>) -> Result<(), ActionError> {
        match outcome {
            Ok(report) => {
                self.presenter.enter_populated(report);
                Ok(())
            }
            Err(err) => {
                self.presenter.enter_error(err.to_string());
                Err(err)
            }
        }
    }
}
