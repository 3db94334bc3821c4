//! Check command - validate spans over one text

use clap::Parser;
use serde::Serialize;
use std::io::{self, Read};

use super::super::output::{color, issue_color, write_output};
use super::super::parser::{GlobalArgs, OutputFormat};
use super::super::utils::{parse_span_spec, resolve_config};
use crate::offset::SpanConverter;
use crate::overlap::resolve_overlaps;
use crate::types::{IssueCode, Span};

/// Validate spans over a text and show what the fixer would do
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Text (reads stdin if omitted)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Span as LABEL:START:END (character offsets, repeatable)
    #[arg(short, long = "span", value_name = "LABEL:START:END", required = true)]
    pub spans: Vec<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SpanCheck {
    span: Span,
    surface: Option<String>,
    valid: bool,
    issues: Vec<IssueCode>,
    warnings: Vec<IssueCode>,
    outcome: &'static str,
    fixed: Option<Span>,
    fixed_surface: Option<String>,
    overlap_dropped: bool,
}

/// Run the check command.
pub fn run(args: CheckArgs, global: &GlobalArgs) -> Result<(), String> {
    let text = match args.text {
        Some(t) => t,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read from stdin: {}", e))?;
            buffer.trim_end_matches('\n').to_string()
        }
    };
    let spans = args
        .spans
        .iter()
        .map(|s| parse_span_spec(s))
        .collect::<Result<Vec<_>, _>>()?;

    let config = resolve_config(global)?;
    let toolkit = config.toolkit().map_err(|e| e.to_string())?;
    let repairer = toolkit.repairer();
    let conv = SpanConverter::new(&text);

    let mut checks: Vec<SpanCheck> = spans
        .into_iter()
        .map(|span| {
            let (fix, validation) = repairer.fix(&text, &conv, &span);
            let fixed = fix.span().cloned();
            SpanCheck {
                surface: span.surface(&text).map(str::to_string),
                valid: validation.is_valid(),
                issues: validation.issues.into_iter().collect(),
                warnings: validation.warnings.into_iter().collect(),
                outcome: fix.kind(),
                fixed_surface: fixed.as_ref().and_then(|s| s.surface(&text)).map(str::to_string),
                fixed,
                overlap_dropped: false,
                span,
            }
        })
        .collect();

    let survivors: Vec<Span> = checks.iter().filter_map(|c| c.fixed.clone()).collect();
    for lost in resolve_overlaps(survivors).dropped {
        if let Some(c) = checks
            .iter_mut()
            .find(|c| !c.overlap_dropped && c.fixed.as_ref() == Some(&lost))
        {
            c.overlap_dropped = true;
        }
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&checks)
                .map_err(|e| format!("Failed to serialize: {}", e))?;
            write_output(&format!("{}\n", json), None)
        }
        OutputFormat::Human => write_output(&format_checks(&checks), None),
    }
}

fn format_checks(checks: &[SpanCheck]) -> String {
    let mut out = String::new();
    for c in checks {
        let status = if c.valid {
            color("32", "valid")
        } else {
            color("31", "invalid")
        };
        out.push_str(&format!(
            "{} [{}, {}) {:?}: {}\n",
            c.span.label,
            c.span.start,
            c.span.end,
            c.surface.as_deref().unwrap_or("<out of range>"),
            status
        ));
        for code in &c.issues {
            out.push_str(&format!("  {}\n", color(issue_color(*code), code.as_str())));
        }
        for code in &c.warnings {
            out.push_str(&format!("  warning: {}\n", code.as_str()));
        }
        match &c.fixed {
            None => out.push_str(&format!("  -> {}\n", color("31", "removed"))),
            Some(_) if c.outcome == "kept" && !c.overlap_dropped => {}
            Some(s) => {
                out.push_str(&format!(
                    "  -> {} [{}, {}) {:?}",
                    c.outcome,
                    s.start,
                    s.end,
                    c.fixed_surface.as_deref().unwrap_or("")
                ));
                if c.overlap_dropped {
                    out.push_str(&format!(" {}", color("36", "(then dropped: OVERLAP)")));
                }
                out.push('\n');
            }
        }
    }
    out
}
