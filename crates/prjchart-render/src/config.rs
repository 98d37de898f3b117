//! Page setup and theme
//!
//! Defaults reproduce a US-Letter landscape sheet with half-inch margins and
//! 7pt text. A TOML file may override any subset of the fields:
//!
//! ```toml
//! font_size = 8.0
//! timezone = "+09:00"
//!
//! [theme]
//! progress = "#2e7d32"
//! ```

use prjchart_core::{ChartError, ChartResult, Color, Size, Timezone};
use serde::Deserialize;
use std::path::Path;

/// Layout configuration for a chart document
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Page width in points
    pub page_width: f64,
    /// Page height in points
    pub page_height: f64,
    /// Margin on every side of the page
    pub margin: f64,
    /// Base text size
    pub font_size: f64,
    /// Smallest size ruler labels shrink to
    pub min_font_size: f64,
    /// Gap below each table row
    pub row_padding: f64,
    /// Height of a task's time bar
    pub taskbar_height: f64,
    /// Remaining height below which the next row goes to a new page
    pub page_break_threshold: f64,
    /// Opacity of the shading on odd rows
    pub band_alpha: f64,
    /// Zone used to turn timestamps into days
    pub timezone: Timezone,
    pub theme: ChartTheme,
}

/// Colors used by the chart
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartTheme {
    pub text: Color,
    pub grid: Color,
    pub rule: Color,
    pub band: Color,
    pub bar_outline: Color,
    pub bar_backing: Color,
    pub progress: Color,
    pub trend: Color,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            text: Color::BLACK,
            grid: Color::BLACK,
            rule: Color::BLACK,
            band: Color::BLACK,
            bar_outline: Color::BLACK,
            bar_backing: Color::WHITE,
            progress: Color::rgb(0x56, 0x56, 0x56),
            trend: Color::BLACK,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            page_width: 792.0,
            page_height: 612.0,
            margin: 36.0,
            font_size: 7.0,
            min_font_size: 4.0,
            row_padding: 3.0,
            taskbar_height: 5.0,
            page_break_threshold: 20.0,
            band_alpha: 0.15,
            timezone: Timezone::Local,
            theme: ChartTheme::default(),
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML configuration, validating the geometry
    pub fn from_toml_str(source: &str) -> ChartResult<Self> {
        let config: ChartConfig =
            toml::from_str(source).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> ChartResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Configure the page size
    pub fn page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Configure the base text size
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn timezone(mut self, tz: Timezone) -> Self {
        self.timezone = tz;
        self
    }

    pub fn page_break_threshold(mut self, threshold: f64) -> Self {
        self.page_break_threshold = threshold;
        self
    }

    /// Drawable area inside the margins
    pub fn bounds(&self) -> Size {
        Size {
            width: self.page_width - 2.0 * self.margin,
            height: self.page_height - 2.0 * self.margin,
        }
    }

    /// Height of one line of base-size text
    pub fn line_height(&self) -> f64 {
        crate::text::line_height(self.font_size)
    }

    /// Reject geometry no layout can satisfy
    pub fn validate(&self) -> ChartResult<()> {
        let bounds = self.bounds();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(ChartError::Config(format!(
                "margins of {} leave no drawable area on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if self.font_size <= 0.0 || self.min_font_size <= 0.0 || self.min_font_size > self.font_size {
            return Err(ChartError::Config(format!(
                "font sizes must satisfy 0 < min_font_size ({}) <= font_size ({})",
                self.min_font_size, self.font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.band_alpha) {
            return Err(ChartError::Config(format!(
                "band_alpha must be within 0..=1, got {}",
                self.band_alpha
            )));
        }
        if self.page_break_threshold < 0.0 || self.page_break_threshold >= bounds.height {
            return Err(ChartError::Config(format!(
                "page_break_threshold {} must be below the drawable height {}",
                self.page_break_threshold, bounds.height
            )));
        }
        Ok(())
    }

    /// Validate the geometry and check the page leaves room for a time axis
    /// right of `columns_width` of label columns
    pub fn validate_layout(&self, columns_width: f64) -> ChartResult<()> {
        self.validate()?;
        let width = self.bounds().width;
        if width <= columns_width {
            return Err(ChartError::Config(format!(
                "drawable width {} leaves no room for the calendar after {} of label columns",
                width, columns_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_letter_landscape() {
        let config = ChartConfig::new();
        let bounds = config.bounds();
        assert_eq!(bounds.width, 720.0);
        assert_eq!(bounds.height, 540.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_subset() {
        let config = ChartConfig::from_toml_str(
            r##"
            font_size = 8.0
            timezone = "utc"

            [theme]
            progress = "#2e7d32"
            "##,
        )
        .unwrap();
        assert_eq!(config.font_size, 8.0);
        assert_eq!(config.timezone, Timezone::Utc);
        assert_eq!(config.theme.progress, Color::rgb(0x2e, 0x7d, 0x32));
        assert_eq!(config.theme.bar_backing, Color::WHITE);
        assert_eq!(config.margin, 36.0);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = ChartConfig::from_toml_str("paper = \"A4\"").unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }

    #[test]
    fn toml_rejects_bad_color() {
        let err = ChartConfig::from_toml_str("[theme]\ntrend = \"blue\"").unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn validate_rejects_oversized_margin() {
        let config = ChartConfig {
            margin: 400.0,
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn page_must_be_wider_than_the_label_columns() {
        let narrow = ChartConfig::new().page_size(300.0, 612.0);
        assert!(narrow.validate().is_ok());
        let err = narrow.validate_layout(240.0).unwrap_err();
        assert!(err.to_string().contains("no room for the calendar"), "{err}");
        assert!(ChartConfig::new().validate_layout(240.0).is_ok());
    }

    #[test]
    fn builder_setters() {
        let config = ChartConfig::new()
            .page_size(842.0, 595.0)
            .font_size(9.0)
            .timezone(Timezone::Utc)
            .page_break_threshold(30.0);
        assert_eq!(config.bounds().width, 770.0);
        assert_eq!(config.font_size, 9.0);
        assert_eq!(config.page_break_threshold, 30.0);
    }
}
