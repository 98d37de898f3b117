//! Calendar range and date-to-coordinate mapping
//!
//! The model is built once per document from the full task list and shared
//! read-only by every drawing component. [`CalendarModel::date_to_x`] is the
//! only place a day becomes a horizontal position, so bars, gridlines and
//! ruler labels always line up.

use chrono::{Datelike, Duration, NaiveDate};
use prjchart_core::{ChartError, ChartResult, Dash, Point, Surface, TaskRecord, TextBox};
use tracing::debug;

use crate::config::ChartConfig;
use crate::text;

/// Dash pattern of the day gridlines
pub const GRID_DASH: Dash = Dash { on: 1.0, off: 3.0 };

/// Visible date range and horizontal scale
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarModel {
    first: NaiveDate,
    last: NaiveDate,
    origin_x: f64,
    date_width: f64,
}

impl CalendarModel {
    /// Cover every task with one day of margin on each side.
    ///
    /// `origin_x` is where the time axis begins (the total width of the label
    /// columns) and `right_edge` where it ends.
    pub fn new(tasks: &[TaskRecord], origin_x: f64, right_edge: f64) -> ChartResult<Self> {
        let min_date = tasks.iter().map(TaskRecord::start).min();
        let max_date = tasks.iter().map(TaskRecord::end).max();
        let (Some(min_date), Some(max_date)) = (min_date, max_date) else {
            return Err(ChartError::EmptySchedule);
        };

        if right_edge <= origin_x {
            return Err(ChartError::Config(format!(
                "page width {} leaves no room for the calendar after {} of label columns",
                right_edge, origin_x
            )));
        }
        let margin = Duration::days(1);
        let (Some(first), Some(last)) = (
            min_date.checked_sub_signed(margin),
            max_date.checked_add_signed(margin),
        ) else {
            return Err(ChartError::InvalidProject(format!(
                "schedule {}..{} leaves no room for the calendar margin",
                min_date, max_date
            )));
        };
        let day_count = (last - first).num_days() + 1;
        let date_width = (right_edge - origin_x) / day_count as f64;

        debug!(
            first = %first,
            last = %last,
            days = day_count,
            date_width,
            "calendar range established"
        );

        Ok(Self {
            first,
            last,
            origin_x,
            date_width,
        })
    }

    /// First day of the range (one day before the earliest start)
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the range (one day after the latest end)
    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the range
    pub fn day_count(&self) -> i64 {
        (self.last - self.first).num_days() + 1
    }

    /// Every day of the range in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take_while(move |d| *d <= self.last)
    }

    /// Width of one day
    pub fn date_width(&self) -> f64 {
        self.date_width
    }

    /// Left edge of the time axis
    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    /// Left edge of `date`'s column
    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        self.origin_x + self.date_width * (date - self.first).num_days() as f64
    }

    /// Height of the ruler band: a month line above a day line
    pub fn ruler_height(config: &ChartConfig) -> f64 {
        2.0 * config.line_height()
    }

    /// Draw the ruler and the dashed day gridlines on the current page.
    ///
    /// Returns the height of the ruler band; the caller places the header
    /// below it.
    pub fn draw_ruler(&self, surface: &mut dyn Surface, config: &ChartConfig) -> f64 {
        let bounds = surface.bounds();
        let line_height = config.line_height();
        let ruler_height = Self::ruler_height(config);

        surface.set_stroke_color(config.theme.grid);
        surface.set_dash(Some(GRID_DASH));
        for day in self.days() {
            let x = self.date_to_x(day);
            surface.stroke_line(Point::new(x, ruler_height), Point::new(x, bounds.height));
        }
        surface.set_dash(None);

        surface.set_fill_color(config.theme.text);
        let day_style = TextBox::new(self.date_width, config.font_size)
            .shrink_to_fit(line_height, config.min_font_size);
        for (i, day) in self.days().enumerate() {
            let x = self.date_to_x(day);
            if i == 0 || day.day() == 1 {
                let label = format!("{}-{}", day.year(), day.month());
                let width = (bounds.width - x).max(text::text_width(&label, config.font_size));
                let month_style = TextBox::new(width, config.font_size);
                surface.text_box(&label, Point::new(x, 0.0), &month_style);
            }
            surface.text_box(&day.day().to_string(), Point::new(x, line_height), &day_style);
        }

        ruler_height
    }
}
