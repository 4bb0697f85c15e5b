//! `bladefmt` format command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bladefmt_config::{CliSettings, Config};
use bladefmt_core::{Diagnostic, FormatOptions, FormatResult, Severity, format};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Name used for standard input in reports.
const STDIN_NAME: &str = "<stdin>";

/// Arguments for formatting templates.
#[derive(Args)]
pub(crate) struct FormatArgs {
    /// Template files to format (default: read stdin, write stdout).
    paths: Vec<PathBuf>,

    /// Rewrite files in place when their formatting changes.
    #[arg(short, long, conflicts_with = "check")]
    write: bool,

    /// Exit with an error if any file would change or cannot be formatted.
    #[arg(long)]
    check: bool,

    /// Print diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (bladefmt.toml).
    #[arg(short, long, env = "BLADEFMT_CONFIG")]
    config: Option<PathBuf>,

    /// Spaces per indentation level (overrides config).
    #[arg(long)]
    indent_size: Option<usize>,

    /// Indent with tabs (overrides config).
    #[arg(long)]
    use_tabs: bool,

    /// Line width above which tags are split (overrides config).
    #[arg(long)]
    max_line_length: Option<usize>,

    /// Sort attributes by kind and name (overrides config).
    #[arg(long)]
    sort_attributes: bool,

    /// Maximum consecutive blank lines to keep (overrides config).
    #[arg(long)]
    preserve_blank_lines: Option<usize>,

    /// Number of files formatted in parallel (default: one per CPU).
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable verbose output (info logs and info diagnostics).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Outcome of formatting one input.
struct Report {
    name: String,
    source: String,
    result: FormatResult,
}

impl Report {
    fn changed(&self) -> bool {
        self.result.changed(&self.source)
    }
}

/// JSON record for one input.
#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    changed: bool,
    diagnostics: Vec<&'a Diagnostic>,
}

impl FormatArgs {
    /// Execute the format command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a file cannot be read or
    /// written, or `--check` finds files that need formatting.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            indent_size: self.indent_size,
            use_tabs: self.use_tabs.then_some(true),
            max_line_length: self.max_line_length,
            sort_attributes: self.sort_attributes.then_some(true),
            preserve_blank_lines: self.preserve_blank_lines,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Using configuration");
        }

        if self.paths.is_empty() {
            return self.format_stdin(&config.format, &output);
        }
        self.format_files(&config.format, &output)
    }

    fn format_stdin(&self, options: &FormatOptions, output: &Output) -> Result<(), CliError> {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        let result = format(&source, options, None);
        let report = Report {
            name: STDIN_NAME.to_owned(),
            source,
            result,
        };

        let mut stdout = std::io::stdout().lock();
        if self.json {
            self.write_json(&mut stdout, std::slice::from_ref(&report))?;
        } else {
            self.print_diagnostics(&report, output);
            if !self.check {
                stdout.write_all(report.result.formatted_text.as_bytes())?;
            }
        }
        stdout.flush()?;

        if self.check && (report.changed() || report.result.has_errors()) {
            return Err(CliError::Check(1));
        }
        Ok(())
    }

    fn format_files(&self, options: &FormatOptions, output: &Output) -> Result<(), CliError> {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = self.jobs {
            pool = pool.num_threads(jobs);
        }
        let pool = pool
            .build()
            .map_err(|e| CliError::Validation(format!("Failed to create thread pool: {e}")))?;

        let write = self.write;
        let results: Vec<Result<Report, CliError>> = pool.install(|| {
            self.paths
                .par_iter()
                .map(|path| format_file(path, options, write))
                .collect()
        });

        let mut stdout = std::io::stdout().lock();
        let mut reports = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (path, result) in self.paths.iter().zip(results) {
            match result {
                Ok(report) => reports.push(report),
                Err(err) => {
                    failed += 1;
                    output.error(&format!("{}: {err}", path.display()));
                }
            }
        }

        if self.json {
            self.write_json(&mut stdout, &reports)?;
        } else {
            for report in &reports {
                self.print_diagnostics(report, output);
                if !self.write && !self.check {
                    stdout.write_all(report.result.formatted_text.as_bytes())?;
                }
            }
        }
        stdout.flush()?;

        let changed: Vec<&Report> = reports.iter().filter(|r| r.changed()).collect();
        if self.check {
            for report in &changed {
                output.warning(&format!("Would reformat: {}", report.name));
            }
            let unformattable = reports.iter().filter(|r| r.result.has_errors()).count();
            let count = changed.len() + unformattable + failed;
            if count > 0 {
                return Err(CliError::Check(count));
            }
            output.success(&format!("{} file(s) already formatted", reports.len()));
            return Ok(());
        }

        if self.write && !self.json {
            output.success(&format!(
                "Formatted {} of {} file(s)",
                changed.len(),
                reports.len()
            ));
        }
        if failed > 0 {
            return Err(CliError::Failed(failed));
        }
        Ok(())
    }

    fn print_diagnostics(&self, report: &Report, output: &Output) {
        let shown = report
            .result
            .diagnostics
            .iter()
            .filter(|d| self.verbose || d.severity > Severity::Info);
        for diagnostic in shown {
            output.diagnostic(&report.name, diagnostic);
        }
    }

    fn write_json(&self, out: &mut impl Write, reports: &[Report]) -> Result<(), CliError> {
        let records: Vec<JsonReport<'_>> = reports
            .iter()
            .map(|report| JsonReport {
                file: &report.name,
                changed: report.changed(),
                diagnostics: report
                    .result
                    .diagnostics
                    .iter()
                    .filter(|d| self.verbose || d.severity > Severity::Info)
                    .collect(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Format one file, rewriting it when `write` is set and it changed.
fn format_file(path: &Path, options: &FormatOptions, write: bool) -> Result<Report, CliError> {
    let source = std::fs::read_to_string(path)?;
    let result = format(&source, options, Some(path));
    let report = Report {
        name: path.display().to_string(),
        source,
        result,
    };
    if write && report.changed() {
        std::fs::write(path, &report.result.formatted_text)?;
        tracing::info!(file = %report.name, "Rewrote file");
    }
    Ok(report)
}
