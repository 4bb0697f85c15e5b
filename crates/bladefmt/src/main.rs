//! bladefmt - formatter for Blade templates.
//!
//! Formats the given template files, or stdin when no file is given:
//! - `--write`: rewrite changed files in place
//! - `--check`: fail when any file would change
//! - `--json`: report diagnostics as JSON

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::FormatArgs;
use output::Output;

/// bladefmt - Blade template formatter.
#[derive(Parser)]
#[command(name = "bladefmt", version, about)]
struct Cli {
    #[command(flatten)]
    args: FormatArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
