//! prjchart CLI - Gantt document generator
//!
//! Turns a stored project document into a paginated Gantt chart.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prjchart_core::Timezone;
use prjchart_render::{export_file_name, ChartConfig, GanttExporter, OutputFormat};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "prjchart")]
#[command(author, version, about = "Paginated Gantt chart generator", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a project document to a Gantt chart
    Export {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to <name>-<lock-version>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (html, svg)
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,

        /// Chart configuration (TOML)
        #[arg(short, long, env = "PRJCHART_CONFIG")]
        config: Option<PathBuf>,

        /// Day boundary time zone (local, utc, +HH:MM)
        #[arg(short, long)]
        timezone: Option<Timezone>,

        /// Project name for the title and default file name
        #[arg(short, long)]
        name: Option<String>,

        /// Lock version encoded in the default file name
        #[arg(long, default_value_t = 0)]
        lock_version: u64,
    },

    /// Validate a project document and print its calendar range
    Check {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Day boundary time zone (local, utc, +HH:MM)
        #[arg(short, long)]
        timezone: Option<Timezone>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        })
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Export {
            file,
            output,
            format,
            config,
            timezone,
            name,
            lock_version,
        } => {
            let config = load_config(config.as_deref(), timezone)?;
            let exporter = GanttExporter::new(config).format(format);
            export(&exporter, &file, output, name, lock_version)
        }
        Commands::Check { file, timezone } => {
            let config = load_config(None, timezone)?;
            check(&GanttExporter::new(config), &file)
        }
    }
}

fn load_config(path: Option<&Path>, timezone: Option<Timezone>) -> Result<ChartConfig> {
    let config = match path {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ChartConfig::default(),
    };
    Ok(match timezone {
        Some(tz) => config.timezone(tz),
        None => config,
    })
}

fn read_project(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn export(
    exporter: &GanttExporter,
    file: &Path,
    output: Option<PathBuf>,
    name: Option<String>,
    lock_version: u64,
) -> Result<()> {
    let json = read_project(file)?;
    let project = exporter
        .load(&json)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let name = name
        .or_else(|| project.name.clone())
        .filter(|n| !n.trim().is_empty())
        .or_else(|| file.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let out = output.unwrap_or_else(|| {
        PathBuf::from(export_file_name(&name, lock_version, exporter.output_format()))
    });
    debug!(name = %name, out = %out.display(), "exporting");

    let summary = exporter
        .export_project(&project, &name, &out)
        .with_context(|| format!("Failed to export {} to {}", file.display(), out.display()))?;

    println!(
        "Exported {} ({} tasks, {} pages, {}..{})",
        out.display(),
        summary.rows,
        summary.pages,
        summary.first_day,
        summary.last_day
    );
    Ok(())
}

fn check(exporter: &GanttExporter, file: &Path) -> Result<()> {
    let json = read_project(file)?;
    let project = exporter
        .load(&json)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let calendar = exporter
        .calendar(&project.tasks)
        .with_context(|| format!("Cannot lay out {}", file.display()))?;

    if let Some(name) = &project.name {
        println!("project: {}", name);
    }
    println!("tasks: {}", project.tasks.len());
    println!("range: {}..{}", calendar.first_day(), calendar.last_day());
    println!("days: {}", calendar.day_count());
    Ok(())
}
