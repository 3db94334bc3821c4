//! Align command - token alignment preflight

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::super::output::{color, write_output};
use super::super::parser::{GlobalArgs, OutputFormat};
use super::super::utils::require_paths;
use crate::align::{AlignSummary, AlignmentMode};
use crate::audit::{discover_files, parse_lines, Line};

/// Count spans the trainer's token alignment would drop or reshape
#[derive(Parser, Debug)]
pub struct AlignArgs {
    /// Files or directories (searched recursively for *.jsonl)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Alignment policy to simulate
    #[arg(long, short = 'm', value_enum, default_value = "strict")]
    pub mode: AlignmentMode,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct FileAlignment {
    path: String,
    #[serde(flatten)]
    summary: AlignSummary,
}

/// Run the align command.
pub fn run(args: AlignArgs, _global: &GlobalArgs) -> Result<(), String> {
    require_paths(&args.paths)?;
    let files = discover_files(&args.paths).map_err(|e| e.to_string())?;
    if files.is_empty() {
        return Err("No .jsonl files found".to_string());
    }

    let mut per_file = Vec::new();
    let mut total = AlignSummary::default();
    for path in &files {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let mut summary = AlignSummary::default();
        for line in parse_lines(&content) {
            if let Line::Record(record) = line {
                summary.add_record(&record, args.mode);
            }
        }
        total.merge(&summary);
        per_file.push(FileAlignment {
            path: path.display().to_string(),
            summary,
        });
    }

    match args.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "mode": args.mode,
                "files": per_file,
                "total": total,
            });
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| format!("Failed to serialize: {}", e))?;
            write_output(&format!("{}\n", json), None)
        }
        OutputFormat::Human => {
            let mut out = String::new();
            for f in &per_file {
                out.push_str(&format!(
                    "{}: {} spans, {} exact, {} reshaped, {} dropped\n",
                    f.path, f.summary.spans, f.summary.exact, f.summary.reshaped, f.summary.dropped
                ));
            }
            let rate = format!("{:.1}%", total.exact_rate());
            out.push_str(&format!(
                "\n{} ({} mode): {} spans, {} aligned\n",
                color("1", "Total"),
                args.mode,
                total.spans,
                if total.dropped == 0 { color("32", &rate) } else { color("33", &rate) }
            ));
            write_output(&out, None)
        }
    }
}
