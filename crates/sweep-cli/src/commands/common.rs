//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use sweep_analysis::{Analysis, Analyzer};
use sweep_core::{ArchiveSource, Config};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; never shown to the user.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load configuration from `--config`, or from `sweep.yml` in the working
/// directory when present.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
            Config::load_from_dir(&cwd).context("Failed to load sweep.yml")
        }
    }
}

/// Open an archive and run the full analysis over it.
pub(crate) fn analyze_archive(path: &Path, global: &GlobalArgs) -> Result<Analysis> {
    let config = load_config(global)?;
    let source = open_archive(path)?;
    log::debug!("Analyzing {}", source.path().display());
    Analyzer::new(config)
        .analyze_source(&source)
        .with_context(|| format!("Failed to analyze {}", path.display()))
}

pub(crate) fn open_archive(path: &Path) -> Result<ArchiveSource> {
    ArchiveSource::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

/// Write pretty JSON to `path`, creating parent directories as needed.
pub(crate) fn write_json_results<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize results")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
///
/// Widths are measured in characters so that table and field names with
/// non-ASCII letters still align.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Prints a left-aligned header row, a separator line of dashes, and each
/// data row. Columns are separated by two spaces.
///
/// ```ignore
/// print_table(
///     &["FIELD", "KIND"],
///     &[vec!["Orders[Total]".into(), "column".into()]],
/// );
/// // FIELD          KIND
/// // -------------  ------
/// // Orders[Total]  column
/// ```
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}
