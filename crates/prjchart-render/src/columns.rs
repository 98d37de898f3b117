//! Fixed label columns on the left of the chart
//!
//! The columns occupy `0..origin_x`; the calendar takes the rest of the
//! page width. Cells wrap, so a row is as tall as its tallest cell.

use prjchart_core::{Point, Surface, TaskRecord, TextBox};

use crate::config::ChartConfig;
use crate::text;

/// One label column
#[derive(Clone, Debug)]
pub struct Column {
    /// Header label
    pub label: &'static str,
    /// Fixed width in points
    pub width: f64,
    /// Cell text for a task
    pub value: fn(&TaskRecord) -> String,
}

/// Ordered set of label columns
#[derive(Clone, Debug)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            columns: vec![
                Column {
                    label: "Name",
                    width: 60.0,
                    value: |t| t.name().to_string(),
                },
                Column {
                    label: "Assignees",
                    width: 60.0,
                    value: TaskRecord::assignees_text,
                },
                Column {
                    label: "Progress",
                    width: 40.0,
                    value: TaskRecord::progress_text,
                },
                Column {
                    label: "Start",
                    width: 40.0,
                    value: TaskRecord::start_date,
                },
                Column {
                    label: "End",
                    width: 40.0,
                    value: TaskRecord::end_date,
                },
            ],
        }
    }
}

impl ColumnLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Total width of the label columns, where the time axis begins
    pub fn origin_x(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }

    /// Cell texts for one task, in column order
    pub fn cells(&self, task: &TaskRecord) -> Vec<String> {
        self.columns.iter().map(|c| (c.value)(task)).collect()
    }

    fn cell_style(column: &Column, max_height: Option<f64>, config: &ChartConfig) -> TextBox {
        let style = TextBox::new(column.width, config.font_size);
        match max_height {
            Some(limit) => style.max_height(limit),
            None => style,
        }
    }

    /// Height a line of cells will take once wrapped and clipped to `max_height`
    pub fn measure<S: AsRef<str>>(&self, cells: &[S], max_height: Option<f64>, config: &ChartConfig) -> f64 {
        self.columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| text::layout(cell.as_ref(), &Self::cell_style(column, max_height, config)).height())
            .fold(0.0, f64::max)
    }

    /// Draw one line of cells with their top edge at `top`, clipping each
    /// cell to `max_height` when given.
    ///
    /// Returns the lowest point any cell reached.
    pub fn draw_cells<S: AsRef<str>>(
        &self,
        surface: &mut dyn Surface,
        cells: &[S],
        top: f64,
        max_height: Option<f64>,
        config: &ChartConfig,
    ) -> f64 {
        surface.set_fill_color(config.theme.text);
        let mut x = 0.0;
        let mut bottom = top;
        for (column, cell) in self.columns.iter().zip(cells) {
            let style = Self::cell_style(column, max_height, config);
            let height = surface.text_box(cell.as_ref(), Point::new(x, top), &style);
            bottom = bottom.max(top + height);
            x += column.width;
        }
        bottom
    }

    /// Draw the header row at `top` and underline it across the page.
    ///
    /// Returns where the next row starts.
    pub fn draw_header(&self, surface: &mut dyn Surface, top: f64, config: &ChartConfig) -> f64 {
        let bottom = self.draw_cells(surface, &self.labels(), top, None, config);
        let width = surface.bounds().width;
        surface.set_stroke_color(config.theme.rule);
        surface.set_dash(None);
        surface.stroke_line(Point::new(0.0, bottom), Point::new(width, bottom));
        bottom + config.row_padding
    }
}
