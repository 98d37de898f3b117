//! Task table with pagination
//!
//! The table is drawn strictly in task order as a small state machine:
//!
//! ```text
//! DrawingHeader -> DrawingRows -> (PageBreak -> DrawingHeader -> DrawingRows)* -> Done
//! ```
//!
//! Every page starts with the calendar ruler and the header row, so each
//! sheet reads on its own. Row shading alternates on the global row index,
//! which is not reset on a new page.

use prjchart_core::{Rect, Surface, TaskRecord};
use tracing::{debug, trace};

use crate::calendar::CalendarModel;
use crate::columns::ColumnLayout;
use crate::config::ChartConfig;
use crate::progress::{ProgressBarRenderer, ProgressPoints};

/// Where the table renderer is in its page cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TablePhase {
    DrawingHeader,
    DrawingRows,
    PageBreak,
    Done,
}

/// Layout state threaded through the row loop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub phase: TablePhase,
    /// Zero-based page being drawn
    pub page: usize,
    /// Top of the next thing to draw, from the top of the bounds
    pub cursor: f64,
    /// Global index of the next row
    pub row: usize,
    /// Where the first row of the current page starts
    pub body_top: f64,
}

impl RenderState {
    pub fn start() -> Self {
        Self {
            phase: TablePhase::DrawingHeader,
            page: 0,
            cursor: 0.0,
            row: 0,
            body_top: 0.0,
        }
    }

    /// Odd rows get a shaded band
    pub fn row_is_shaded(&self) -> bool {
        self.row % 2 == 1
    }
}

/// Summary of a finished table
#[derive(Clone, Debug, PartialEq)]
pub struct TableOutcome {
    pub pages: usize,
    pub rows: usize,
    pub points: ProgressPoints,
}

/// Draws the ruler, header and task rows across as many pages as needed
#[derive(Clone, Debug)]
pub struct TableRenderer<'a> {
    calendar: &'a CalendarModel,
    columns: &'a ColumnLayout,
    config: &'a ChartConfig,
}

impl<'a> TableRenderer<'a> {
    pub fn new(calendar: &'a CalendarModel, columns: &'a ColumnLayout, config: &'a ChartConfig) -> Self {
        Self {
            calendar,
            columns,
            config,
        }
    }

    /// Draw every task, breaking pages as the cursor nears the bottom
    pub fn draw(&self, surface: &mut dyn Surface, tasks: &[TaskRecord]) -> TableOutcome {
        let mut points = ProgressPoints::with_capacity(tasks.len());
        let mut state = RenderState::start();
        let mut remaining = tasks.iter();
        let mut next_task = remaining.next();

        while state.phase != TablePhase::Done {
            state = match state.phase {
                TablePhase::DrawingHeader => self.draw_page_top(surface, state),
                TablePhase::DrawingRows => match next_task {
                    Some(task) => {
                        let cells = self.columns.cells(task);
                        if self.overflows(surface, &cells, state) {
                            RenderState {
                                phase: TablePhase::PageBreak,
                                ..state
                            }
                        } else {
                            let state = self.draw_row(surface, task, &cells, state, &mut points);
                            next_task = remaining.next();
                            self.after_row(surface, state, next_task.is_some())
                        }
                    }
                    None => RenderState {
                        phase: TablePhase::Done,
                        ..state
                    },
                },
                TablePhase::PageBreak => self.break_page(surface, state),
                TablePhase::Done => state,
            };
        }

        debug!(pages = state.page + 1, rows = state.row, "table drawn");
        TableOutcome {
            pages: state.page + 1,
            rows: state.row,
            points,
        }
    }

    /// Ruler and header at the top of the current page
    fn draw_page_top(&self, surface: &mut dyn Surface, state: RenderState) -> RenderState {
        let ruler_bottom = self.calendar.draw_ruler(surface, self.config);
        let cursor = self.columns.draw_header(surface, ruler_bottom, self.config);
        RenderState {
            phase: TablePhase::DrawingRows,
            cursor,
            body_top: cursor,
            ..state
        }
    }

    /// Tallest a row may grow: everything below the header
    fn row_limit(&self, surface: &dyn Surface, state: RenderState) -> f64 {
        surface.bounds().height - state.body_top
    }

    /// A row that would cross the bottom edge moves to the next page, unless
    /// it already starts a page; then it is clipped to fit.
    fn overflows(&self, surface: &dyn Surface, cells: &[String], state: RenderState) -> bool {
        if state.cursor <= state.body_top {
            return false;
        }
        let limit = self.row_limit(surface, state);
        let height = self.columns.measure(cells, Some(limit), self.config);
        state.cursor + height > surface.bounds().height
    }

    /// One task row: cells, optional shading, then the bar
    fn draw_row(
        &self,
        surface: &mut dyn Surface,
        task: &TaskRecord,
        cells: &[String],
        state: RenderState,
        points: &mut ProgressPoints,
    ) -> RenderState {
        let top = state.cursor;
        let limit = self.row_limit(surface, state);
        let bottom = self.columns.draw_cells(surface, cells, top, Some(limit), self.config);

        if state.row_is_shaded() {
            let band = Rect::new(0.0, top - 1.0, surface.bounds().width, bottom - top + 2.0);
            surface.set_fill_color(self.config.theme.band);
            surface.set_fill_alpha(self.config.band_alpha);
            surface.fill_rectangle(band);
            surface.set_fill_alpha(1.0);
        }

        let point = ProgressBarRenderer::new(self.calendar, self.config).draw(surface, task, top);
        points.record(task.task_index(), point);
        trace!(row = state.row, task = task.task_index(), page = state.page, top, bottom, "row drawn");

        RenderState {
            cursor: bottom + self.config.row_padding,
            row: state.row + 1,
            ..state
        }
    }

    /// Decide whether the next row still fits on this page
    fn after_row(&self, surface: &dyn Surface, state: RenderState, more_rows: bool) -> RenderState {
        let remaining = surface.bounds().height - state.cursor;
        let phase = if more_rows && remaining < self.config.page_break_threshold {
            TablePhase::PageBreak
        } else {
            TablePhase::DrawingRows
        };
        RenderState { phase, ..state }
    }

    fn break_page(&self, surface: &mut dyn Surface, state: RenderState) -> RenderState {
        surface.start_new_page();
        debug!(page = state.page + 1, next_row = state.row, "page break");
        RenderState {
            phase: TablePhase::DrawingHeader,
            page: state.page + 1,
            cursor: 0.0,
            ..state
        }
    }
}
