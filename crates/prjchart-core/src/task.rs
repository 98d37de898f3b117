//! Task input model and normalization
//!
//! The schedule editor stores a project as a JSON object with a `tasks`
//! array. Its fields are loosely typed (numbers sometimes arrive as strings,
//! `depends` is a comma-separated string, assignments are objects), so the
//! raw form keeps `serde_json::Value`s and [`TaskRecord::from_raw`] does the
//! validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ChartError, ChartResult, TaskIndex, Timezone};

/// Display format for task dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Workload assumed when a task carries none (or zero)
pub const DEFAULT_WORKLOAD: f64 = 100.0;

/// Separator between assignees in the rendered cell
pub const ASSIGNEE_SEPARATOR: &str = ",";

// ============================================================================
// Raw input
// ============================================================================

/// Project document as stored by the schedule editor
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawProject {
    /// Project display name, if the document carries one
    #[serde(default)]
    pub name: Option<String>,
    pub tasks: Vec<RawTask>,
}

/// One task exactly as the editor stored it
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawTask {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub code: Option<Value>,
    pub level: Option<Value>,
    pub status: Option<Value>,
    /// Milliseconds since the epoch
    pub start: Option<Value>,
    /// Milliseconds since the epoch
    pub end: Option<Value>,
    pub assigs: Option<Value>,
    pub depends: Option<Value>,
    pub progress: Option<Value>,
    pub workload: Option<Value>,
}

/// Parse a stored project document
pub fn parse_project(json: &str) -> ChartResult<RawProject> {
    serde_json::from_str(json).map_err(|e| ChartError::InvalidProject(e.to_string()))
}

/// Normalize every raw task, failing on the first malformed one
pub fn normalize_tasks(raw: &[RawTask], tz: Timezone) -> ChartResult<Vec<TaskRecord>> {
    raw.iter()
        .enumerate()
        .map(|(index, task)| TaskRecord::from_raw(index, task, tz))
        .collect()
}

// ============================================================================
// Normalized task
// ============================================================================

/// A numeric figure that remembers how the editor wrote it
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub text: String,
}

impl Quantity {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            text: format_number(value),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(|v| Self {
                value: v,
                text: n.to_string(),
            }),
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| Self {
                    value: v,
                    text: trimmed.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Normalized, immutable view of one schedule item
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRecord {
    index: TaskIndex,
    name: String,
    code: Option<String>,
    level: Option<i64>,
    status: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
    assignees: Vec<String>,
    depends: Vec<String>,
    progress: Option<Quantity>,
    workload: Option<Quantity>,
}

impl TaskRecord {
    /// Create a task spanning `start..=end`, failing like
    /// [`TaskRecord::from_raw`] when the dates are reversed or too close to
    /// the edge of the supported calendar.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> ChartResult<Self> {
        let name = name.into();
        check_span(start, end).map_err(|reason| ChartError::MalformedTask {
            index: 0,
            name: name.clone(),
            reason,
        })?;
        Ok(Self {
            index: 0,
            name,
            code: None,
            level: None,
            status: None,
            start,
            end,
            assignees: Vec::new(),
            depends: Vec::new(),
            progress: None,
            workload: None,
        })
    }

    pub fn index(mut self, index: TaskIndex) -> Self {
        self.index = index;
        self
    }

    pub fn assign(mut self, assignee: impl Into<String>) -> Self {
        self.assignees.push(assignee.into());
        self
    }

    pub fn progress(mut self, progress: f64) -> Self {
        self.progress = done_work(Quantity::new(progress));
        self
    }

    pub fn workload(mut self, workload: f64) -> Self {
        self.workload = total_work(Quantity::new(workload));
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Validate and normalize one raw task.
    ///
    /// `start` and `end` must be numeric millisecond timestamps and must not
    /// be reversed once truncated to days in `tz`.
    pub fn from_raw(index: TaskIndex, raw: &RawTask, tz: Timezone) -> ChartResult<Self> {
        let name = raw.name.as_ref().map(value_text).unwrap_or_default();
        let malformed = |reason: String| ChartError::MalformedTask {
            index,
            name: if name.is_empty() {
                "<unnamed>".to_string()
            } else {
                name.clone()
            },
            reason,
        };

        let start = parse_date(raw.start.as_ref(), "start", tz).map_err(&malformed)?;
        let end = parse_date(raw.end.as_ref(), "end", tz).map_err(&malformed)?;
        check_span(start, end).map_err(&malformed)?;

        Ok(Self {
            index,
            name,
            code: raw.code.as_ref().map(value_text).filter(|c| !c.is_empty()),
            level: raw.level.as_ref().and_then(Value::as_i64),
            status: raw.status.as_ref().map(value_text).filter(|s| !s.is_empty()),
            start,
            end,
            assignees: raw.assigs.as_ref().map(parse_assignees).unwrap_or_default(),
            depends: raw.depends.as_ref().map(parse_depends).unwrap_or_default(),
            progress: raw.progress.as_ref().and_then(Quantity::from_value).and_then(done_work),
            workload: raw.workload.as_ref().and_then(Quantity::from_value).and_then(total_work),
        })
    }

    // ------------------------------------------------------------------------
    // Raw accessors
    // ------------------------------------------------------------------------

    /// Position in the original task list
    pub fn task_index(&self) -> TaskIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code_str(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn level(&self) -> Option<i64> {
        self.level
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    /// Inclusive day count, always at least 1
    pub fn duration(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Units of work done; 0.0 when absent or negative
    pub fn progress_value(&self) -> f64 {
        self.progress.as_ref().map_or(0.0, |p| p.value)
    }

    /// Total units of work; 100.0 when absent, zero or negative
    pub fn workload_value(&self) -> f64 {
        self.workload.as_ref().map_or(DEFAULT_WORKLOAD, |w| w.value)
    }

    /// Completed share of the workload. Not clamped: a task reporting more
    /// progress than workload yields a fraction above 1.
    pub fn progress_fraction(&self) -> f64 {
        self.progress_value() / self.workload_value()
    }

    // ------------------------------------------------------------------------
    // Formatted accessors
    // ------------------------------------------------------------------------

    pub fn start_date(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_date(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    pub fn assignees_text(&self) -> String {
        self.assignees.join(ASSIGNEE_SEPARATOR)
    }

    /// `"<progress>/<workload>"`, numbers as the editor wrote them
    pub fn progress_text(&self) -> String {
        let progress = self.progress.as_ref().map_or("0", |p| p.text.as_str());
        let workload = self
            .workload
            .as_ref()
            .map_or_else(|| format_number(DEFAULT_WORKLOAD), |w| w.text.clone());
        format!("{}/{}", progress, workload)
    }
}

// ============================================================================
// Field parsing
// ============================================================================

fn parse_date(value: Option<&Value>, field: &str, tz: Timezone) -> Result<NaiveDate, String> {
    let value = match value {
        None | Some(Value::Null) => return Err(format!("missing {}", field)),
        Some(v) => v,
    };
    let millis = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
    .ok_or_else(|| format!("{} is not a millisecond timestamp: {}", field, value))?;

    tz.date_from_millis(millis)
        .filter(|date| date.pred_opt().is_some() && date.succ_opt().is_some())
        .ok_or_else(|| format!("{} timestamp {} is out of range", field, millis))
}

/// `start..=end` must be ordered and leave a day of calendar margin on both sides
fn check_span(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if end < start {
        return Err(format!(
            "end {} is before start {}",
            end.format(DATE_FORMAT),
            start.format(DATE_FORMAT)
        ));
    }
    if start.pred_opt().is_none() || end.succ_opt().is_none() {
        return Err(format!(
            "dates {}..{} are out of range",
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT)
        ));
    }
    Ok(())
}

/// Negative or non-finite progress counts as none
fn done_work(quantity: Quantity) -> Option<Quantity> {
    Some(quantity).filter(|q| q.value.is_finite() && q.value >= 0.0)
}

/// Zero, negative or non-finite workload falls back to the default
fn total_work(quantity: Quantity) -> Option<Quantity> {
    Some(quantity).filter(|q| q.value.is_finite() && q.value > 0.0)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_assignees(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => map
                    .get("resourceId")
                    .or_else(|| map.get("id"))
                    .map(value_text),
                Value::Null => None,
                other => Some(value_text(other)),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => vec![value_text(other)],
    }
}

fn parse_depends(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items.iter().map(value_text).filter(|s| !s.is_empty()).collect(),
        Value::Null => Vec::new(),
        other => vec![value_text(other)],
    }
}

/// Format a float keeping one decimal for whole numbers (`100.0`)
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
