//! # prjchart-render
//!
//! Paginated Gantt chart layout for prjchart.
//!
//! This crate provides:
//! - `CalendarModel`: visible date range and the date-to-x mapping
//! - `ColumnLayout`: the fixed label columns and header row
//! - `TableRenderer`: row layout with page breaks, ruler and header on every page
//! - `ProgressBarRenderer`: time bar and (unclamped) progress overlay
//! - `TrendLineRenderer`: polyline through the progress points, split per page
//! - `SvgSurface`: multi-page SVG or printable HTML output
//! - `RecordingSurface`: captures drawing calls for tests
//! - `GanttExporter`: the whole pipeline, ending in an atomic file publish
//!
//! ## Example
//!
//! ```rust,ignore
//! use prjchart_render::{ChartConfig, GanttExporter, OutputFormat};
//!
//! let exporter = GanttExporter::new(ChartConfig::default()).format(OutputFormat::Svg);
//! let json = std::fs::read_to_string("project.json")?;
//! let summary = exporter.export_json(&json, "Website", "Website-3.svg".as_ref())?;
//! println!("{} pages", summary.pages);
//! ```

pub mod calendar;
pub mod columns;
pub mod config;
pub mod export;
pub mod progress;
pub mod publish;
pub mod recording;
pub mod svg_surface;
pub mod table;
pub mod text;
pub mod trend;

pub use calendar::CalendarModel;
pub use columns::{Column, ColumnLayout};
pub use config::{ChartConfig, ChartTheme};
pub use export::{ChartSummary, GanttExporter, LoadedProject};
pub use progress::{BarGeometry, ProgressBarRenderer, ProgressPoint, ProgressPoints};
pub use publish::{export_file_name, publish_atomically};
pub use recording::{DrawOp, Recorded, RecordingSurface};
pub use svg_surface::{OutputFormat, SvgSurface};
pub use table::{RenderState, TableOutcome, TablePhase, TableRenderer};
pub use trend::{TrendLineRenderer, TrendSegment};
