//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fieldsweep - find unused columns and measures in report template archives
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: sweep.yml in the current directory)
    #[arg(short, long, global = true, env = "SWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every column and measure as used or unused
    Analyze(AnalyzeArgs),

    /// Show why a single field is (or is not) used
    Explain(ExplainArgs),

    /// List the tables, columns and measures declared by the schema
    Catalog(CatalogArgs),
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Report template archive (.pbit) or extracted archive directory
    pub archive: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: AnalyzeOutput,

    /// Also write the full JSON report to this path
    #[arg(short, long)]
    pub write: Option<PathBuf>,

    /// Only list unused fields and tables
    #[arg(long)]
    pub only_unused: bool,

    /// Exit with code 1 when any column or measure is unused
    #[arg(long)]
    pub fail_on_unused: bool,
}

/// Analyze output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutput {
    /// Counts per object kind and category
    Summary,
    /// One row per field
    Table,
    /// Full JSON report
    Json,
}

/// Arguments for the explain command
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Report template archive (.pbit) or extracted archive directory
    pub archive: PathBuf,

    /// Field to explain, as Table[Name] or 'Table'[Name]
    pub field: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: ExplainOutput,
}

/// Explain output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainOutput {
    Text,
    Json,
}

/// Arguments for the catalog command
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Report template archive (.pbit) or extracted archive directory
    pub archive: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: CatalogOutput,
}

/// Catalog output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOutput {
    Table,
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
