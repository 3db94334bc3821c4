//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};

use crate::audit::{AuditReport, FileReport};
use crate::types::IssueCode;

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Log success message with a green check (respects quiet flag)
pub fn log_success(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{} {}", color("32", "✓"), msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content).map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Colorize text with ANSI escape codes (only if stdout is a terminal)
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Color for an accuracy percentage.
fn accuracy_color(accuracy: f64) -> &'static str {
    if accuracy >= 95.0 {
        "32"
    } else if accuracy >= 80.0 {
        "33"
    } else {
        "31"
    }
}

/// Color for an issue code.
pub fn issue_color(code: IssueCode) -> &'static str {
    match code {
        IssueCode::LeadingWhitespace | IssueCode::TrailingWhitespace => "33",
        IssueCode::Overlap | IssueCode::UnknownLabel => "36",
        _ => "31",
    }
}

/// Render one file's summary.
pub fn format_file_report(report: &FileReport) -> String {
    let mut out = String::new();
    let s = &report.stats;
    out.push_str(&format!("{}\n", color("1", &report.path)));
    out.push_str(&format!(
        "  records: {}  changed: {}  parse errors: {}\n",
        report.records,
        report.changed_records,
        report.parse_errors.len()
    ));
    if s.entities_before > 0 {
        out.push_str(&format!(
            "  entities: {} -> {}  (unchanged {}, trimmed {}, repaired {}, removed {})\n",
            s.entities_before, s.entities_after, s.unchanged, s.trimmed, s.repaired, s.removed
        ));
        out.push_str(&format!(
            "  accuracy: {}\n",
            color(accuracy_color(report.accuracy), &format!("{:.1}%", report.accuracy))
        ));
    }
    if s.intents.total > 0 {
        out.push_str(&format!(
            "  intents: {} values, {} binarized, {} dropped\n",
            s.intents.total, s.intents.changed, s.intents.dropped
        ));
    }
    for err in report.parse_errors.iter().take(5) {
        out.push_str(&format!("  {} line {}: {}\n", color("31", "parse error"), err.line, err.message));
    }
    if report.parse_errors.len() > 5 {
        out.push_str(&format!("  ... {} more parse errors\n", report.parse_errors.len() - 5));
    }
    if let Some(backup) = &report.backup {
        out.push_str(&format!("  backup: {}\n", backup));
    }
    if let Some(output) = &report.output {
        out.push_str(&format!("  written: {}\n", output));
    }
    out
}

/// Render a whole run.
pub fn format_report(report: &AuditReport, per_file: bool) -> String {
    let mut out = String::new();
    if per_file {
        for file in &report.files {
            out.push_str(&format_file_report(file));
        }
        out.push('\n');
    }

    let t = &report.totals;
    out.push_str(&format!("{}\n", color("1", "Summary")));
    out.push_str(&format!(
        "  files: {}  records: {}  changed: {}  parse errors: {}\n",
        report.files.len(),
        report.records,
        report.changed_records,
        report.parse_errors
    ));
    out.push_str(&format!(
        "  entities: {} -> {}  (unchanged {}, trimmed {}, repaired {}, removed {})\n",
        t.entities_before, t.entities_after, t.unchanged, t.trimmed, t.repaired, t.removed
    ));
    out.push_str(&format!(
        "  accuracy: {}\n",
        color(accuracy_color(report.accuracy), &format!("{:.1}%", report.accuracy))
    ));
    if t.intents.total > 0 {
        out.push_str(&format!(
            "  intents: {} values, {} binarized, {} dropped\n",
            t.intents.total, t.intents.changed, t.intents.dropped
        ));
    }

    if !t.issues.is_empty() {
        out.push_str("\n  Issues:\n");
        let mut issues: Vec<_> = t.issues.iter().collect();
        issues.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (code, n) in issues {
            out.push_str(&format!("    {:<22} {}\n", color(issue_color(*code), code.as_str()), n));
        }
    }
    if !t.warnings.is_empty() {
        out.push_str("\n  Warnings:\n");
        for (code, n) in &t.warnings {
            out.push_str(&format!("    {:<22} {}\n", code.as_str(), n));
        }
    }

    let mut worst: Vec<_> = t
        .labels
        .iter()
        .filter(|(_, l)| l.before > l.unchanged)
        .collect();
    worst.sort_by(|a, b| (b.1.before - b.1.unchanged).cmp(&(a.1.before - a.1.unchanged)));
    if !worst.is_empty() {
        out.push_str("\n  Labels needing fixes:\n");
        for (label, l) in worst.iter().take(10) {
            out.push_str(&format!(
                "    {:<22} {} of {} (trimmed {}, repaired {}, removed {})\n",
                label,
                l.before - l.unchanged,
                l.before,
                l.trimmed,
                l.repaired,
                l.removed
            ));
        }
    }

    for failure in &report.failures {
        out.push_str(&format!("\n  {} {}: {}\n", color("31", "failed"), failure.path, failure.error));
    }
    out
}
