//! Document generation pipeline
//!
//! raw JSON -> `TaskRecord`s -> `CalendarModel` -> table rows (recording
//! progress points) -> trend line -> serialized document -> atomic publish.
//!
//! Every task is validated and the calendar is built before the first
//! drawing call, so malformed input never produces a partial document.

use chrono::NaiveDate;
use prjchart_core::{normalize_tasks, parse_project, ChartResult, Surface, TaskRecord};
use std::path::Path;
use tracing::{debug, info};

use crate::calendar::CalendarModel;
use crate::columns::ColumnLayout;
use crate::config::ChartConfig;
use crate::publish::publish_atomically;
use crate::svg_surface::{OutputFormat, SvgSurface};
use crate::table::TableRenderer;
use crate::trend::TrendLineRenderer;

/// What a finished layout produced
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSummary {
    pub pages: usize,
    pub rows: usize,
    /// Tasks whose progress point joined the trend line
    pub trend_points: usize,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

/// Tasks loaded from a stored project document
#[derive(Clone, Debug)]
pub struct LoadedProject {
    pub name: Option<String>,
    pub tasks: Vec<TaskRecord>,
}

/// Gantt chart document generator
#[derive(Clone, Debug, Default)]
pub struct GanttExporter {
    config: ChartConfig,
    columns: ColumnLayout,
    format: OutputFormat,
}

impl GanttExporter {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Select the output document kind
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    /// Parse and normalize a stored project, failing on the first bad task
    pub fn load(&self, json: &str) -> ChartResult<LoadedProject> {
        let project = parse_project(json)?;
        let tasks = normalize_tasks(&project.tasks, self.config.timezone)?;
        debug!(tasks = tasks.len(), "project loaded");
        Ok(LoadedProject {
            name: project.name,
            tasks,
        })
    }

    /// Build the calendar these tasks would be drawn against
    pub fn calendar(&self, tasks: &[TaskRecord]) -> ChartResult<CalendarModel> {
        CalendarModel::new(tasks, self.columns.origin_x(), self.config.bounds().width)
    }

    /// Lay the chart out on `surface`
    pub fn render(&self, tasks: &[TaskRecord], surface: &mut dyn Surface) -> ChartResult<ChartSummary> {
        self.config.validate_layout(self.columns.origin_x())?;
        let calendar = CalendarModel::new(tasks, self.columns.origin_x(), surface.bounds().width)?;

        let table = TableRenderer::new(&calendar, &self.columns, &self.config).draw(surface, tasks);
        TrendLineRenderer::new().draw(surface, &table.points, &self.config);

        Ok(ChartSummary {
            pages: table.pages,
            rows: table.rows,
            trend_points: table.points.len(),
            first_day: calendar.first_day(),
            last_day: calendar.last_day(),
        })
    }

    /// Lay the chart out and serialize it
    pub fn render_document(&self, title: &str, tasks: &[TaskRecord]) -> ChartResult<(Vec<u8>, ChartSummary)> {
        let mut surface = SvgSurface::new(&self.config, title);
        let summary = self.render(tasks, &mut surface)?;
        let bytes = surface.into_bytes(self.format)?;
        Ok((bytes, summary))
    }

    /// Generate the document for a stored project and publish it at `out`
    pub fn export_json(&self, json: &str, title: &str, out: &Path) -> ChartResult<ChartSummary> {
        let project = self.load(json)?;
        self.export_project(&project, title, out)
    }

    /// Render already loaded tasks and publish the document at `out`
    pub fn export_project(&self, project: &LoadedProject, title: &str, out: &Path) -> ChartResult<ChartSummary> {
        let (bytes, summary) = self.render_document(title, &project.tasks)?;
        publish_atomically(out, &bytes)?;
        info!(
            path = %out.display(),
            pages = summary.pages,
            rows = summary.rows,
            format = %self.format,
            "chart exported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingSurface};
    use prjchart_core::{ChartError, Timezone};
    use tempfile::tempdir;

    fn exporter() -> GanttExporter {
        GanttExporter::new(ChartConfig::default().timezone(Timezone::Utc))
    }

    #[test]
    fn load_rejects_malformed_before_drawing() {
        let json = r#"{"tasks": [{"name": "ok", "start": 0, "end": 0}, {"name": "bad", "start": 0}]}"#;
        assert!(matches!(
            exporter().load(json),
            Err(ChartError::MalformedTask { index: 1, .. })
        ));
    }

    #[test]
    fn empty_schedule_draws_nothing() {
        let mut surface = RecordingSurface::new(ChartConfig::default().bounds());
        let err = exporter().render(&[], &mut surface).unwrap_err();
        assert!(matches!(err, ChartError::EmptySchedule));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn trend_line_is_drawn_after_rows() {
        let json = r#"{"tasks": [
            {"name": "A", "start": 1704067200000, "end": 1704412800000, "progress": 50},
            {"name": "B", "start": 1704240000000, "end": 1704844800000, "progress": 20}
        ]}"#;
        let exporter = exporter();
        let project = exporter.load(json).unwrap();
        let mut surface = RecordingSurface::new(exporter.config().bounds());
        let summary = exporter.render(&project.tasks, &mut surface).unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.trend_points, 2);
        assert_eq!(summary.first_day, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(summary.last_day, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert!(matches!(surface.ops().last().unwrap().op, DrawOp::Polyline(ref p) if p.len() == 2));
    }

    const TWO_TASKS: &str = r#"{"name": "Site", "tasks": [
        {"name": "A", "start": 1704067200000, "end": 1704412800000, "progress": 50},
        {"name": "B", "start": 1704240000000, "end": 1704844800000, "progress": 20}
    ]}"#;

    #[test]
    fn narrow_page_is_rejected_before_drawing() {
        let exporter = GanttExporter::new(ChartConfig::default().timezone(Timezone::Utc).page_size(300.0, 612.0));
        let project = exporter.load(TWO_TASKS).unwrap();
        let mut surface = RecordingSurface::new(exporter.config().bounds());
        let err = exporter.render(&project.tasks, &mut surface).unwrap_err();
        assert!(matches!(err, ChartError::Config(_)), "{err}");
        assert!(surface.ops().is_empty());
        assert!(exporter.calendar(&project.tasks).is_err());
    }

    #[test]
    fn export_project_publishes_loaded_tasks() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Site-2.svg");
        let exporter = exporter().format(OutputFormat::Svg);
        let project = exporter.load(TWO_TASKS).unwrap();
        assert_eq!(project.name.as_deref(), Some("Site"));

        let summary = exporter.export_project(&project, "Site", &out).unwrap();
        assert_eq!(summary.rows, 2);
        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">A<"));
    }

    #[test]
    fn failed_export_json_publishes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("broken.html");
        let json = r#"{"tasks": [{"name": "bad", "start": 1704412800000, "end": 1704067200000}]}"#;
        assert!(exporter().export_json(json, "broken", &out).is_err());
        assert!(!out.exists());
    }
}
