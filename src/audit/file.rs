//! JSONL reading, backups and atomic writes.

use super::stats::ParseError;
use crate::config::BackupNaming;
use crate::types::Record;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// One parsed line.
#[derive(Debug, Clone)]
pub enum Line {
    /// A record.
    Record(Record),
    /// A line that failed to parse; dropped from rewritten output.
    Malformed(ParseError),
}

/// Parse JSONL content. Blank lines are skipped; malformed lines are
/// reported with their 1-based line number.
#[must_use]
pub fn parse_lines(content: &str) -> Vec<Line> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| match serde_json::from_str::<Record>(line) {
            Ok(record) => Line::Record(record),
            Err(e) => Line::Malformed(ParseError {
                line: idx + 1,
                message: e.to_string(),
            }),
        })
        .collect()
}

/// Serialize records as JSONL with a trailing newline.
pub fn render_records<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line()?);
        out.push('\n');
    }
    Ok(out)
}

/// Backup path for `path` at time `now`. Never returns an existing path.
#[must_use]
pub fn backup_path(path: &Path, naming: BackupNaming, now: DateTime<Local>) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match naming {
        BackupNaming::Timestamped => format!("{}.backup_{}", name, now.format("%Y%m%d_%H%M%S")),
        BackupNaming::Plain => format!("{}.backup", name),
    };

    let candidate = path.with_file_name(&stem);
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|n| path.with_file_name(format!("{}_{}", stem, n)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Copy `path` to a fresh backup sibling and return the backup path.
pub fn create_backup(path: &Path, naming: BackupNaming) -> Result<PathBuf> {
    let backup = backup_path(path, naming, Local::now());
    fs::copy(path, &backup)?;
    log::info!("backup written to {}", backup.display());
    Ok(backup)
}

/// Write via a temporary sibling and rename, so readers never see a
/// half-written file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp-{}", name, std::process::id()));
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
