//! Drawing surface capability
//!
//! Layout code never talks to a concrete document format. It draws through
//! [`Surface`], which a paged SVG document or a recording test double can
//! implement. All coordinates are page-relative points measured from the
//! top-left corner of the drawable bounds, with `y` growing downward.

use serde::Deserialize;
use std::fmt;

/// A position on the current page
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` with or without a leading `#`
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}' (expected #RRGGBB)", value))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Dashed stroke pattern: `on` points drawn, `off` points skipped
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
}

/// How a text box lays out its content
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    /// Wrapping width
    pub width: f64,
    /// Height limit; `None` lets the text grow downward
    pub max_height: Option<f64>,
    pub font_size: f64,
    /// Smallest size shrink-to-fit may reach
    pub min_font_size: f64,
    /// Reduce the font size until the text fits `max_height`
    pub shrink_to_fit: bool,
}

impl TextBox {
    pub fn new(width: f64, font_size: f64) -> Self {
        Self {
            width,
            max_height: None,
            font_size,
            min_font_size: font_size,
            shrink_to_fit: false,
        }
    }

    /// Clip whatever wraps below `max_height`
    pub fn max_height(mut self, max_height: f64) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Limit the box height and shrink the text down to `min_font_size` to fit
    pub fn shrink_to_fit(mut self, max_height: f64, min_font_size: f64) -> Self {
        self.max_height = Some(max_height);
        self.min_font_size = min_font_size;
        self.shrink_to_fit = true;
        self
    }
}

/// Operations the chart layout needs from an output document.
///
/// A surface starts with one open page. Drawing calls target the current
/// page; [`Surface::go_to_page`] reopens an earlier page so overlays drawn
/// after pagination land on the right sheet.
pub trait Surface {
    /// Drawable area shared by every page
    fn bounds(&self) -> Size;

    fn page_count(&self) -> usize;

    /// Zero-based index of the page drawing calls go to
    fn current_page(&self) -> usize;

    /// Append a page and make it current
    fn start_new_page(&mut self);

    /// Make an existing page current
    fn go_to_page(&mut self, page: usize);

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_color(&mut self, color: Color);

    /// Opacity for subsequent fills, `1.0` is opaque
    fn set_fill_alpha(&mut self, alpha: f64);

    /// Dash pattern for subsequent strokes, `None` for solid lines
    fn set_dash(&mut self, dash: Option<Dash>);

    /// Draw `text` with its top-left corner at `at`, wrapped to the box
    /// width. Returns the height the text occupies.
    fn text_box(&mut self, text: &str, at: Point, style: &TextBox) -> f64;

    fn fill_rectangle(&mut self, rect: Rect);

    fn stroke_rectangle(&mut self, rect: Rect);

    fn stroke_line(&mut self, from: Point, to: Point);

    /// Stroke an open path through `points`
    fn stroke_polyline(&mut self, points: &[Point]);
}
