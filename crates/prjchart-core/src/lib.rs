//! # prjchart-core
//!
//! Core domain model and traits for the prjchart Gantt document generator.
//!
//! This crate provides:
//! - Input types: `RawProject`, `RawTask` (the editor's stored JSON)
//! - The normalized, immutable `TaskRecord`
//! - Day-resolution time zone handling: `Timezone`
//! - The `Surface` drawing capability and its geometry primitives
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```rust
//! use prjchart_core::{normalize_tasks, parse_project, Timezone};
//!
//! let json = r#"{"tasks": [
//!     {"name": "Design", "start": 1704067200000, "end": 1704412800000, "progress": 30}
//! ]}"#;
//! let project = parse_project(json).unwrap();
//! let tasks = normalize_tasks(&project.tasks, Timezone::Utc).unwrap();
//! assert_eq!(tasks[0].duration(), 5);
//! assert_eq!(tasks[0].progress_text(), "30/100.0");
//! ```

pub mod surface;
pub mod task;
pub mod timezone;

pub use surface::{Color, Dash, Point, Rect, Size, Surface, TextBox};
pub use task::{normalize_tasks, parse_project, Quantity, RawProject, RawTask, TaskRecord};
pub use timezone::Timezone;

use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Position of a task in the original task list
pub type TaskIndex = usize;

/// Result alias used across the prjchart crates
pub type ChartResult<T> = Result<T, ChartError>;

// ============================================================================
// Errors
// ============================================================================

/// Chart generation error
///
/// Every variant aborts generation. Task and schedule errors are raised
/// before the first drawing call, so no partial document is ever produced.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Malformed task #{index} ({name}): {reason}")]
    MalformedTask {
        index: TaskIndex,
        name: String,
        reason: String,
    },

    #[error("Empty schedule: at least one task is required to lay out a calendar")]
    EmptySchedule,

    #[error("Invalid project data: {0}")]
    InvalidProject(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
