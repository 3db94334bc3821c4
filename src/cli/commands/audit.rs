//! Audit command - read-only report

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{format_report, log_info, write_output};
use super::super::parser::{GlobalArgs, OutputFormat};
use super::super::utils::{require_paths, resolve_config};
use crate::{Auditor, WriteMode};

/// Audit JSONL files without modifying them
#[derive(Parser, Debug)]
pub struct AuditArgs {
    /// Files or directories (searched recursively for *.jsonl)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Only print the summary, not per-file sections
    #[arg(long)]
    pub summary: bool,

    /// Exit with failure if accuracy is below this percentage
    #[arg(long, value_name = "PERCENT")]
    pub min_accuracy: Option<f64>,
}

/// Run the audit command.
pub fn run(args: AuditArgs, global: &GlobalArgs) -> Result<(), String> {
    require_paths(&args.paths)?;
    let config = resolve_config(global)?;
    let auditor = Auditor::new(config).map_err(|e| e.to_string())?;

    log_info(&format!("Auditing with profile '{}'", auditor.config().profile), global.quiet);
    let report = auditor
        .run(&args.paths, &WriteMode::DryRun)
        .map_err(|e| e.to_string())?;

    let json = report.to_json().map_err(|e| e.to_string())?;
    if let Some(path) = &args.report {
        std::fs::write(path, format!("{}\n", json))
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
        log_info(&format!("Report written to {}", path.display()), global.quiet);
    }

    match args.format {
        OutputFormat::Json => write_output(&format!("{}\n", json), None)?,
        OutputFormat::Human => write_output(&format_report(&report, !args.summary), None)?,
    }

    if report.has_failures() {
        return Err(format!("{} file(s) could not be processed", report.failures.len()));
    }
    if let Some(min) = args.min_accuracy {
        if report.accuracy < min {
            return Err(format!(
                "accuracy {:.1}% is below the required {:.1}%",
                report.accuracy, min
            ));
        }
    }
    Ok(())
}
