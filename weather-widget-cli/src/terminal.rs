use std::{collections::HashMap, io::Write};

use weather_widget_core::{Field, Region, Surface};

/// Draws each region when it becomes visible. The terminal is append-only,
/// so hiding a region only changes which one counts as shown.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    shown: Option<Region>,
    texts: HashMap<Field, String>,
    icon: Option<String>,
    error: String,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: None,
            texts: HashMap::new(),
            icon: None,
            error: String::new(),
        }
    }

    #[cfg(test)]
    pub fn shown(&self) -> Option<Region> {
        self.shown
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&self, field: Field) -> &str {
        self.texts.get(&field).map(String::as_str).unwrap_or("")
    }

    fn render(&mut self, region: Region) -> std::io::Result<()> {
        match region {
            Region::Spinner => writeln!(self.out, "⏳ Loading weather...")?,
            Region::ErrorBanner => writeln!(self.out, "✖ {}", self.error)?,
            Region::WeatherCard => {
                let card = format!(
                    "\n{}, {}\n  {}  {}\n  Feels like  {}\n  Humidity    {}\n  Wind        {}\n",
                    self.text(Field::CityName),
                    self.text(Field::Country),
                    self.text(Field::Temperature),
                    self.text(Field::Condition),
                    self.text(Field::FeelsLike),
                    self.text(Field::Humidity),
                    self.text(Field::WindSpeed),
                );
                self.out.write_all(card.as_bytes())?;
                if let Some(icon) = &self.icon {
                    writeln!(self.out, "  Icon        {icon}")?;
                }
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_visible(&mut self, region: Region, visible: bool) {
        if !visible {
            if self.shown == Some(region) {
                self.shown = None;
            }
            return;
        }

        self.shown = Some(region);
        if let Err(err) = self.render(region) {
            tracing::warn!(error = %err, ?region, "Failed to write to terminal");
        }
    }

    fn set_text(&mut self, field: Field, text: &str) {
        self.texts.insert(field, text.to_string());
    }

    fn set_error_text(&mut self, message: &str) {
        self.error = message.to_string();
    }

    fn set_icon(&mut self, src: &str, _alt: &str) {
        self.icon = Some(src.to_string());
    }
}
