//! Paged SVG document surface
//!
//! Each page is kept as an SVG group in bounds coordinates. When the
//! document is finished the pages are serialized either into one printable
//! HTML file (one `<svg>` per sheet, separated by page breaks) or into a
//! single SVG with the sheets stacked vertically.

use prjchart_core::{ChartError, ChartResult, Color, Dash, Point, Rect, Size, Surface, TextBox};
use std::fmt;
use std::str::FromStr;
use svg::node::element::{Group, Line, Polyline, Rectangle, Text};
use svg::{Document, Node};

use crate::config::ChartConfig;
use crate::text;

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const LINE_WIDTH: f64 = 1.0;
/// Vertical gap between sheets in stacked SVG output
const SHEET_GAP: f64 = 24.0;
/// Share of the font size above the baseline
const ASCENT_EM: f64 = 0.9;

/// Serialized document kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Printable HTML, one sheet per printed page
    #[default]
    Html,
    /// One SVG with the sheets stacked top to bottom
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(format!("unknown output format '{}' (expected html or svg)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Graphics state applied to new elements
#[derive(Clone, Copy, Debug)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    alpha: f64,
    dash: Option<Dash>,
}

/// [`Surface`] producing a multi-page SVG/HTML document
#[derive(Clone, Debug)]
pub struct SvgSurface {
    title: String,
    page_width: f64,
    page_height: f64,
    margin: f64,
    bounds: Size,
    pages: Vec<Group>,
    current: usize,
    state: GraphicsState,
}

impl SvgSurface {
    /// Begin a document with one empty page
    pub fn new(config: &ChartConfig, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page_width: config.page_width,
            page_height: config.page_height,
            margin: config.margin,
            bounds: config.bounds(),
            pages: vec![Group::new().set("class", "content")],
            current: 0,
            state: GraphicsState {
                fill: Color::BLACK,
                stroke: Color::BLACK,
                alpha: 1.0,
                dash: None,
            },
        }
    }

    fn add<T>(&mut self, node: T)
    where
        T: Into<Box<dyn Node>>,
    {
        let page = &mut self.pages[self.current];
        let group = std::mem::replace(page, Group::new());
        *page = group.add(node);
    }

    fn stroked<T: Node>(&self, mut element: T) -> T {
        element.assign("fill", "none");
        element.assign("stroke", self.state.stroke.to_string());
        element.assign("stroke-width", LINE_WIDTH);
        if let Some(dash) = self.state.dash {
            element.assign("stroke-dasharray", format!("{} {}", dash.on, dash.off));
        }
        element
    }

    /// One sheet: white paper with the content inset by the margin
    fn sheet(&self, page: usize) -> Group {
        let paper = Rectangle::new()
            .set("width", self.page_width)
            .set("height", self.page_height)
            .set("fill", "#ffffff");
        let content = self.pages[page]
            .clone()
            .set("transform", format!("translate({},{})", self.margin, self.margin));
        Group::new()
            .set("class", "page")
            .set("data-page", (page + 1).to_string())
            .add(paper)
            .add(content)
    }

    fn page_document(&self, page: usize) -> Document {
        Document::new()
            .set("width", self.page_width)
            .set("height", self.page_height)
            .set("viewBox", (0.0, 0.0, self.page_width, self.page_height))
            .set("xmlns", "http://www.w3.org/2000/svg")
            .add(self.sheet(page))
    }

    fn stacked_document(&self) -> Document {
        let count = self.pages.len() as f64;
        let height = count * self.page_height + (count - 1.0) * SHEET_GAP;
        let mut document = Document::new()
            .set("width", self.page_width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, self.page_width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");
        for page in 0..self.pages.len() {
            let offset = page as f64 * (self.page_height + SHEET_GAP);
            let sheet = self
                .sheet(page)
                .set("transform", format!("translate(0,{})", offset));
            let border = Rectangle::new()
                .set("y", offset)
                .set("width", self.page_width)
                .set("height", self.page_height)
                .set("fill", "none")
                .set("stroke", "#cccccc");
            document = document.add(sheet).add(border);
        }
        document
    }

    fn html_document(&self) -> String {
        let sheets: Vec<String> = (0..self.pages.len())
            .map(|page| self.page_document(page).to_string())
            .collect();
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        @page {{ size: {width}pt {height}pt; margin: 0; }}
        body {{ margin: 0; background: #e0e0e0; }}
        .sheet {{ width: {width}pt; margin: 0 auto 16px; background: #ffffff; page-break-after: always; break-after: page; }}
        .sheet:last-child {{ page-break-after: auto; break-after: auto; }}
        .sheet svg {{ display: block; width: {width}pt; height: {height}pt; }}
    </style>
</head>
<body>
{sheets}
</body>
</html>
"#,
            title = html_escape(&self.title),
            width = self.page_width,
            height = self.page_height,
            sheets = sheets
                .iter()
                .map(|svg| format!("<div class=\"sheet\">\n{}\n</div>", svg))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Finish the document and serialize it
    pub fn into_bytes(self, format: OutputFormat) -> ChartResult<Vec<u8>> {
        match format {
            OutputFormat::Html => Ok(self.html_document().into_bytes()),
            OutputFormat::Svg => {
                let mut output = Vec::new();
                svg::write(&mut output, &self.stacked_document())
                    .map_err(|e| ChartError::Format(format!("Failed to write SVG: {}", e)))?;
                Ok(output)
            }
        }
    }
}

impl Surface for SvgSurface {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn start_new_page(&mut self) {
        self.pages.push(Group::new().set("class", "content"));
        self.current = self.pages.len() - 1;
    }

    fn go_to_page(&mut self, page: usize) {
        self.current = page.min(self.pages.len() - 1);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_fill_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_dash(&mut self, dash: Option<Dash>) {
        self.state.dash = dash;
    }

    fn text_box(&mut self, content: &str, at: Point, style: &TextBox) -> f64 {
        let layout = text::layout(content, style);
        let line_height = text::line_height(layout.font_size);
        let fill = self.state.fill.to_string();
        for (i, line) in layout.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = at.y + i as f64 * line_height + layout.font_size * ASCENT_EM;
            let node = Text::new(line.as_str())
                .set("x", at.x)
                .set("y", baseline)
                .set("font-family", FONT_FAMILY)
                .set("font-size", layout.font_size)
                .set("fill", fill.as_str());
            self.add(node);
        }
        layout.height()
    }

    fn fill_rectangle(&mut self, rect: Rect) {
        let mut node = Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height)
            .set("fill", self.state.fill.to_string());
        if self.state.alpha < 1.0 {
            node = node.set("fill-opacity", self.state.alpha);
        }
        self.add(node);
    }

    fn stroke_rectangle(&mut self, rect: Rect) {
        let node = self.stroked(
            Rectangle::new()
                .set("x", rect.x)
                .set("y", rect.y)
                .set("width", rect.width)
                .set("height", rect.height),
        );
        self.add(node);
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        let node = self.stroked(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y),
        );
        self.add(node);
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        if points.len() < 2 {
            return;
        }
        let path = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let node = self.stroked(Polyline::new().set("points", path).set("class", "trend"));
        self.add(node);
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SvgSurface {
        SvgSurface::new(&ChartConfig::default(), "Plan <v2>")
    }

    #[test]
    fn format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Svg.extension(), "svg");
    }

    #[test]
    fn pages_are_appended_and_revisited() {
        let mut surface = surface();
        assert_eq!(surface.page_count(), 1);
        surface.start_new_page();
        surface.start_new_page();
        assert_eq!(surface.current_page(), 2);
        surface.go_to_page(0);
        assert_eq!(surface.current_page(), 0);
        surface.go_to_page(9);
        assert_eq!(surface.current_page(), 2);
    }

    #[test]
    fn html_has_one_svg_per_page() {
        let mut surface = surface();
        surface.text_box("first", Point::new(0.0, 0.0), &TextBox::new(60.0, 7.0));
        surface.start_new_page();
        surface.text_box("second", Point::new(0.0, 0.0), &TextBox::new(60.0, 7.0));

        let html = String::from_utf8(surface.into_bytes(OutputFormat::Html).unwrap()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Plan &lt;v2&gt;</title>"));
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("page-break-after: always"));
        assert!(html.contains(">first<"));
        assert!(html.contains(">second<"));
    }

    #[test]
    fn stacked_svg_translates_sheets() {
        let mut surface = surface();
        surface.set_dash(Some(Dash { on: 1.0, off: 3.0 }));
        surface.stroke_line(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        surface.start_new_page();
        surface.set_fill_alpha(0.15);
        surface.fill_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0));

        let svg = String::from_utf8(surface.into_bytes(OutputFormat::Svg).unwrap()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("class=\"page\"").count(), 2);
        assert!(svg.contains("translate(0,636)"));
        assert!(svg.contains("stroke-dasharray=\"1 3\""));
        assert!(svg.contains("fill-opacity=\"0.15\""));
    }

    #[test]
    fn single_point_polyline_is_skipped() {
        let mut surface = surface();
        surface.stroke_polyline(&[Point::new(1.0, 1.0)]);
        surface.stroke_polyline(&[Point::new(1.0, 1.0), Point::new(5.0, 2.0)]);
        let svg = String::from_utf8(surface.into_bytes(OutputFormat::Svg).unwrap()).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("points=\"1,1 5,2\""));
    }

    #[test]
    fn html_escape_works() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }
}
