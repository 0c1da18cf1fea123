//! Fieldsweep CLI - static usage analysis for report template archives

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{analyze, catalog, explain};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(err) = run(&cli) {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Analyze(args) => analyze::execute(args, &cli.global),
        cli::Commands::Explain(args) => explain::execute(args, &cli.global),
        cli::Commands::Catalog(args) => catalog::execute(args, &cli.global),
    }
}

/// Library crates log through the `log` facade; RUST_LOG overrides the default.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
