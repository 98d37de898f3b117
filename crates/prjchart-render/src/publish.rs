//! Atomic publication of finished documents
//!
//! A document is written to a temporary file next to its destination and
//! renamed into place only once complete, so readers never observe a
//! half-written chart and a failed run leaves nothing behind.

use prjchart_core::{ChartError, ChartResult};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::svg_surface::OutputFormat;

/// Write `bytes` to `path` atomically
pub fn publish_atomically(path: &Path, bytes: &[u8]) -> ChartResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| ChartError::Io(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "document published");
    Ok(())
}

/// File name for an exported project: `<name>-<lock_version>.<ext>`.
///
/// Path separators, control characters and characters Windows forbids are
/// replaced with `_`; an empty name becomes `project`.
pub fn export_file_name(project_name: &str, lock_version: u64, format: OutputFormat) -> String {
    let sanitized: String = project_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = match sanitized.trim_matches('.') {
        "" => "project",
        s => s,
    };
    format!("{}-{}.{}", stem, lock_version, format.extension())
}
