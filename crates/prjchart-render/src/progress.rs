//! Task time bar with its progress overlay

use prjchart_core::{Point, Rect, Surface, TaskIndex, TaskRecord};
use tracing::warn;

use crate::calendar::CalendarModel;
use crate::config::ChartConfig;

/// Right edge of a task's progress overlay, with the page it was drawn on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressPoint {
    pub page: usize,
    pub point: Point,
}

/// Progress points keyed by task index, filled while rows are drawn
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressPoints {
    points: Vec<Option<ProgressPoint>>,
}

impl ProgressPoints {
    pub fn with_capacity(task_count: usize) -> Self {
        Self {
            points: vec![None; task_count],
        }
    }

    pub fn record(&mut self, index: TaskIndex, point: ProgressPoint) {
        if index >= self.points.len() {
            self.points.resize(index + 1, None);
        }
        self.points[index] = Some(point);
    }

    pub fn get(&self, index: TaskIndex) -> Option<ProgressPoint> {
        self.points.get(index).copied().flatten()
    }

    /// Recorded points in task order, skipping tasks that drew no row
    pub fn recorded(&self) -> impl Iterator<Item = (TaskIndex, ProgressPoint)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (i, p)))
    }

    pub fn len(&self) -> usize {
        self.recorded().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Geometry of one task bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarGeometry {
    /// Outline spanning the task's days
    pub outline: Rect,
    /// Filled share of the outline; may be wider than it
    pub overlay: Rect,
}

impl BarGeometry {
    /// Right edge of the overlay at the bar's top
    pub fn progress_point(&self) -> Point {
        Point::new(self.overlay.right(), self.overlay.y)
    }
}

/// Draws the outline bar and progress overlay for a task
#[derive(Clone, Copy, Debug)]
pub struct ProgressBarRenderer<'a> {
    calendar: &'a CalendarModel,
    config: &'a ChartConfig,
}

impl<'a> ProgressBarRenderer<'a> {
    pub fn new(calendar: &'a CalendarModel, config: &'a ChartConfig) -> Self {
        Self { calendar, config }
    }

    /// Bar position for `task` in a row whose top edge is at `top`
    pub fn geometry(&self, task: &TaskRecord, top: f64) -> BarGeometry {
        let bar_x = self.calendar.date_to_x(task.start());
        let bar_width = self.calendar.date_width() * task.duration() as f64;
        let progress_width = match bar_width * task.progress_fraction() {
            width if width.is_finite() => width,
            _ => 0.0,
        };
        let height = self.config.taskbar_height;

        BarGeometry {
            outline: Rect::new(bar_x, top, bar_width, height),
            overlay: Rect::new(bar_x, top, progress_width, height),
        }
    }

    /// Draw the bar and return its progress point on the current page
    pub fn draw(&self, surface: &mut dyn Surface, task: &TaskRecord, top: f64) -> ProgressPoint {
        let geometry = self.geometry(task, top);
        if !task.progress_fraction().is_finite() {
            warn!(
                task = task.task_index(),
                name = task.name(),
                progress = %task.progress_text(),
                "progress ratio overflows, drawing no overlay"
            );
        } else if task.progress_fraction() > 1.0 {
            warn!(
                task = task.task_index(),
                name = task.name(),
                progress = %task.progress_text(),
                "progress exceeds workload"
            );
        }

        let theme = &self.config.theme;
        surface.set_fill_alpha(1.0);
        surface.set_fill_color(theme.bar_backing);
        surface.fill_rectangle(geometry.outline);
        surface.set_stroke_color(theme.bar_outline);
        surface.set_dash(None);
        surface.stroke_rectangle(geometry.outline);
        surface.set_fill_color(theme.progress);
        surface.fill_rectangle(geometry.overlay);

        ProgressPoint {
            page: surface.current_page(),
            point: geometry.progress_point(),
        }
    }
}
