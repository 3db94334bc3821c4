//! Utility functions for CLI commands

use std::path::PathBuf;

use super::parser::GlobalArgs;
use crate::types::Span;
use crate::AuditConfig;

/// Resolve the configuration from `--profile` and `--config`.
///
/// An explicit `--profile` wins over a `profile` key in the file.
pub fn resolve_config(global: &GlobalArgs) -> Result<AuditConfig, String> {
    match &global.config {
        Some(path) => AuditConfig::load(path, global.profile).map_err(|e| e.to_string()),
        None => Ok(AuditConfig::from_profile(global.profile.unwrap_or_default())),
    }
}

/// Log level implied by `-v` / `-q`.
pub fn log_level(global: &GlobalArgs) -> log::LevelFilter {
    if global.quiet {
        return log::LevelFilter::Error;
    }
    match global.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Parse a span spec `LABEL:START:END`.
///
/// Split from the right so labels may contain colons.
pub fn parse_span_spec(s: &str) -> Result<Span, String> {
    let parts: Vec<&str> = s.rsplitn(3, ':').collect();
    if parts.len() < 3 || parts[2].is_empty() {
        return Err(format!("Invalid span '{}': expected LABEL:START:END", s));
    }
    let end: i64 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid end offset '{}' in '{}'", parts[0], s))?;
    let start: i64 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid start offset '{}' in '{}'", parts[1], s))?;
    Ok(Span::new(start, end, parts[2]))
}

/// Require at least one path.
pub fn require_paths(paths: &[PathBuf]) -> Result<(), String> {
    if paths.is_empty() {
        Err("No input paths given".to_string())
    } else {
        Ok(())
    }
}
