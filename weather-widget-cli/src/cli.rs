use std::{
    fmt,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{
    Confirm, CustomType, CustomUserError, InquireError, Password, Select, Text,
    validator::Validation,
};
use weather_widget_core::{Config, Key, LocationConfig, Widget};

use crate::terminal::TerminalSurface;

type TerminalWidget = Widget<TerminalSurface<Stdout>>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key and an optional default location.
    Configure {
        /// Store this key without prompting.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: Vec<String>,
    },

    /// Show current weather for the configured location.
    Here,

    /// Prompt for lookups until you quit (the default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;
        tracing::debug!(path = %config_path.display(), "Loaded configuration");

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure { api_key } => configure(config, &config_path, api_key),
            Command::Show { city } => {
                let mut widget = terminal_widget(&config);
                widget.set_input(city.join(" "));
                Ok(exit_code(widget.handle_search().await.is_ok()))
            }
            Command::Here => {
                let mut widget = terminal_widget(&config);
                Ok(exit_code(widget.handle_location().await.is_ok()))
            }
            Command::Interactive => interactive(terminal_widget(&config)).await,
        }
    }
}

fn terminal_widget(config: &Config) -> TerminalWidget {
    Widget::from_config(config, TerminalSurface::new(stdout()))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Search,
    UseLocation,
    Quit,
}

impl MenuItem {
    const fn all() -> &'static [MenuItem] {
        &[MenuItem::Search, MenuItem::UseLocation, MenuItem::Quit]
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search city",
            MenuItem::UseLocation => "Use my location",
            MenuItem::Quit => "Quit",
        })
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// The outcome of each action is already on screen, so errors are dropped.
async fn interactive(mut widget: TerminalWidget) -> Result<ExitCode> {
    let _ = widget.startup();

    loop {
        let choice = match Select::new("What would you like to do?", MenuItem::all().to_vec())
            .prompt()
        {
            Ok(choice) => choice,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err).context("Failed to read menu selection"),
        };

        match choice {
            MenuItem::Search => {
                // A failed lookup leaves the previous input for editing.
                let input = match Text::new("City:")
                    .with_initial_value(widget.input())
                    .prompt()
                {
                    Ok(input) => input,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(err) => return Err(err).context("Failed to read city name"),
                };
                widget.set_input(input);
                let _ = widget.handle_key(Key::Enter).await;
            }
            MenuItem::UseLocation => {
                let _ = widget.handle_location().await;
            }
            MenuItem::Quit => break,
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn configure(mut config: Config, path: &Path, api_key: Option<String>) -> Result<ExitCode> {
    let prompted = api_key.is_none();
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };
    config.set_api_key(api_key.trim());

    if !config.is_configured() {
        anyhow::bail!("The API key must not be empty.");
    }

    // With --api-key the stored location is left as it is.
    if prompted {
        let wants_location = Confirm::new("Set a default location for `weather here`?")
            .with_default(config.location.is_some())
            .prompt()
            .context("Failed to read answer")?;

        let location = if wants_location {
            Some(prompt_location()?)
        } else {
            None
        };
        config.set_location(location);
    }

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

fn within(value: f64, limit: f64, name: &str) -> Result<Validation, CustomUserError> {
    if (-limit..=limit).contains(&value) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid(
            format!("{name} must be between -{limit} and {limit}.").into(),
        ))
    }
}

fn prompt_location() -> Result<LocationConfig> {
    let latitude = CustomType::<f64>::new("Latitude:")
        .with_validator(|value: &f64| within(*value, 90.0, "Latitude"))
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Longitude:")
        .with_validator(|value: &f64| within(*value, 180.0, "Longitude"))
        .prompt()
        .context("Failed to read longitude")?;

    Ok(LocationConfig {
        latitude,
        longitude,
    })
}
