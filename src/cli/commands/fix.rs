//! Fix command - repair files (dry run by default)

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{format_report, log_info, log_success, write_output};
use super::super::parser::{GlobalArgs, OutputFormat};
use super::super::utils::{require_paths, resolve_config};
use crate::{Auditor, WriteMode};

/// Fix JSONL files
#[derive(Parser, Debug)]
pub struct FixArgs {
    /// Files or directories (searched recursively for *.jsonl)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Rewrite files in place (a backup is written first)
    #[arg(long, conflicts_with = "output")]
    pub apply: bool,

    /// Write fixed copies into this directory instead
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl FixArgs {
    fn mode(&self) -> WriteMode {
        match (&self.output, self.apply) {
            (Some(dir), _) => WriteMode::To(dir.clone()),
            (None, true) => WriteMode::InPlace,
            (None, false) => WriteMode::DryRun,
        }
    }
}

/// Run the fix command.
pub fn run(args: FixArgs, global: &GlobalArgs) -> Result<(), String> {
    require_paths(&args.paths)?;
    let config = resolve_config(global)?;
    let auditor = Auditor::new(config).map_err(|e| e.to_string())?;
    let mode = args.mode();

    if mode == WriteMode::DryRun {
        log_info("Dry run: no files will be modified (use --apply to write)", global.quiet);
    }
    let report = auditor.run(&args.paths, &mode).map_err(|e| e.to_string())?;

    let json = report.to_json().map_err(|e| e.to_string())?;
    if let Some(path) = &args.report {
        std::fs::write(path, format!("{}\n", json))
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
    }
    match args.format {
        OutputFormat::Json => write_output(&format!("{}\n", json), None)?,
        OutputFormat::Human => write_output(&format_report(&report, true), None)?,
    }

    if report.has_failures() {
        return Err(format!("{} file(s) could not be processed", report.failures.len()));
    }
    if mode != WriteMode::DryRun {
        log_success(&format!("Fixed {} file(s)", report.files.len()), global.quiet);
    }
    Ok(())
}
