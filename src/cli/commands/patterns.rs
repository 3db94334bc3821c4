//! Patterns command - inspect the pattern registry

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, write_output};
use super::super::parser::{GlobalArgs, OutputFormat};
use super::super::utils::resolve_config;

/// List registry patterns, or test a string against them
#[derive(Parser, Debug)]
pub struct PatternsArgs {
    /// Only show this label
    #[arg(long, short = 'l', value_name = "LABEL")]
    pub label: Option<String>,

    /// Report which patterns fully match this string
    #[arg(long, short = 't', value_name = "STRING")]
    pub test: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct PatternRow<'a> {
    label: &'a str,
    description: &'a str,
    regex: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<bool>,
}

/// Run the patterns command.
pub fn run(args: PatternsArgs, global: &GlobalArgs) -> Result<(), String> {
    let config = resolve_config(global)?;
    let registry = config.build_registry().map_err(|e| e.to_string())?;

    if let Some(label) = &args.label {
        if registry.get(label).is_none() {
            return Err(format!(
                "'{}' has no pattern (open-vocabulary or unknown label)",
                label
            ));
        }
    }

    let rows: Vec<PatternRow<'_>> = registry
        .entries()
        .filter(|e| args.label.as_deref().map_or(true, |l| e.label() == l))
        .map(|e| PatternRow {
            label: e.label(),
            description: e.description(),
            regex: e.source(),
            matches: args.test.as_deref().map(|t| e.full_match(t)),
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| format!("Failed to serialize: {}", e))?;
            write_output(&format!("{}\n", json), None)?;
        }
        OutputFormat::Human => {
            let mut out = String::new();
            match &args.test {
                Some(test) => {
                    let hits: Vec<_> = rows.iter().filter(|r| r.matches == Some(true)).collect();
                    if hits.is_empty() {
                        out.push_str(&format!("{:?} matches no pattern\n", test));
                    }
                    for row in hits {
                        out.push_str(&format!("{} {}\n", color("32", "✓"), row.label));
                    }
                }
                None => {
                    for row in &rows {
                        out.push_str(&format!("{:<16} {}\n", color("1", row.label), row.description));
                        if args.label.is_some() {
                            out.push_str(&format!("  {}\n", row.regex));
                        }
                    }
                }
            }
            write_output(&out, None)?;
        }
    }

    Ok(())
}
