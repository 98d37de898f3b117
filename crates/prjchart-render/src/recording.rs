//! Surface that records drawing calls instead of producing a document
//!
//! Used to test layout without parsing SVG. Each call is stored with the
//! page it targeted and the graphics state in effect.

use prjchart_core::{Color, Dash, Point, Rect, Size, Surface, TextBox};

use crate::text;

/// A captured drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        at: Point,
        width: f64,
        height: f64,
        font_size: f64,
    },
    FillRect(Rect),
    StrokeRect(Rect),
    Line {
        from: Point,
        to: Point,
        dashed: bool,
    },
    Polyline(Vec<Point>),
}

/// A drawing call with the state it was made in
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub page: usize,
    pub op: DrawOp,
    pub fill: Color,
    pub stroke: Color,
    pub alpha: f64,
}

/// In-memory [`Surface`] for tests
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    bounds: Size,
    pages: usize,
    current: usize,
    fill: Color,
    stroke: Color,
    alpha: f64,
    dash: Option<Dash>,
    ops: Vec<Recorded>,
}

impl RecordingSurface {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            pages: 1,
            current: 0,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            alpha: 1.0,
            dash: None,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Recorded] {
        &self.ops
    }

    /// Text drawn on `page`, in drawing order
    pub fn texts_on_page(&self, page: usize) -> Vec<String> {
        self.ops
            .iter()
            .filter(|r| r.page == page)
            .filter_map(|r| match &r.op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Calls made on `page`
    pub fn ops_on_page(&self, page: usize) -> impl Iterator<Item = &Recorded> + '_ {
        self.ops.iter().filter(move |r| r.page == page)
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(Recorded {
            page: self.current,
            op,
            fill: self.fill,
            stroke: self.stroke,
            alpha: self.alpha,
        });
    }
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn start_new_page(&mut self) {
        self.pages += 1;
        self.current = self.pages - 1;
    }

    fn go_to_page(&mut self, page: usize) {
        assert!(page < self.pages, "page {} does not exist", page);
        self.current = page;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_fill_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn set_dash(&mut self, dash: Option<Dash>) {
        self.dash = dash;
    }

    fn text_box(&mut self, content: &str, at: Point, style: &TextBox) -> f64 {
        let layout = text::layout(content, style);
        let height = layout.height();
        self.push(DrawOp::Text {
            text: content.to_string(),
            at,
            width: style.width,
            height,
            font_size: layout.font_size,
        });
        height
    }

    fn fill_rectangle(&mut self, rect: Rect) {
        self.push(DrawOp::FillRect(rect));
    }

    fn stroke_rectangle(&mut self, rect: Rect) {
        self.push(DrawOp::StrokeRect(rect));
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        let dashed = self.dash.is_some();
        self.push(DrawOp::Line { from, to, dashed });
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        self.push(DrawOp::Polyline(points.to_vec()));
    }
}
