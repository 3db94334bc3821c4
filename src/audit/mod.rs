//! Record- and file-level audit/fix driver.
//!
//! [`Auditor`] ties the pieces together:
//!
//! ```text
//!   file ──parse──▶ records ──process_record──▶ fixed records ──▶ write
//!     │               │                              │
//!     │               └─ malformed lines counted     └─ counters ──▶ FileReport
//!     └─ backup (in-place mode only, before any write)
//! ```
//!
//! Per-span and per-record problems are recovered locally and counted. Only
//! file I/O failures abort a file, and one failed file never stops the rest
//! of the batch.

mod file;
mod processor;
mod stats;

pub use file::{backup_path, create_backup, parse_lines, render_records, write_atomic, Line};
pub use processor::process_record;
pub use stats::{AuditReport, FileFailure, FileReport, LabelStats, ParseError, RecordStats};

use crate::config::AuditConfig;
use crate::toolkit::Toolkit;
use crate::types::{Record, RecordKind};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where fixed records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
    /// Report only.
    DryRun,
    /// Back up, then overwrite the original.
    InPlace,
    /// Write fixed copies into this directory; originals are untouched.
    To(PathBuf),
}

impl WriteMode {
    /// Report label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::DryRun => "dry-run",
            WriteMode::InPlace => "in-place",
            WriteMode::To(_) => "output",
        }
    }
}

/// Runs the pipeline over records and files.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: AuditConfig,
    toolkit: Toolkit,
}

impl Auditor {
    /// Build the runtime objects for `config`.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let toolkit = config.toolkit()?;
        Ok(Self { config, toolkit })
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// The runtime objects.
    #[must_use]
    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    /// Clean one record.
    ///
    /// ```
    /// use spanguard::{Auditor, AuditConfig, Record, Span};
    ///
    /// let auditor = Auditor::new(AuditConfig::default()).unwrap();
    /// let record = Record::with_entities(
    ///     "Reconnect 192.168.1.1/24 now",
    ///     vec![Span::new(10, 24, "IP_ADDRESS")],
    /// );
    /// let (fixed, stats) = auditor.process(&record);
    /// assert_eq!(fixed.entities.unwrap(), vec![Span::new(10, 21, "IP_ADDRESS")]);
    /// assert_eq!(stats.repaired, 1);
    /// ```
    #[must_use]
    pub fn process(&self, record: &Record) -> (Record, RecordStats) {
        process_record(&self.toolkit, record)
    }

    /// Process JSONL content. Returns the rewritten content (malformed lines
    /// omitted) and a report for `path`.
    pub fn process_content(&self, path: &Path, content: &str) -> Result<(String, FileReport)> {
        let mut report = FileReport::new(path);
        let mut fixed = Vec::new();

        for line in parse_lines(content) {
            report.lines += 1;
            match line {
                Line::Record(record) => {
                    report.records += 1;
                    let (out, stats) = self.process(&record);
                    if out != record {
                        report.changed_records += 1;
                    }
                    report.stats.merge(&stats);
                    fixed.push(out);
                }
                Line::Malformed(err) => {
                    log::warn!("{}:{}: skipping malformed line: {}", path.display(), err.line, err.message);
                    report.parse_errors.push(err);
                }
            }
        }

        if report.kind == RecordKind::Mixed {
            report.kind = RecordKind::from_records(&fixed);
        }
        report.finish();
        Ok((render_records(&fixed)?, report))
    }

    /// Process one file under `mode`.
    pub fn process_file(&self, path: &Path, mode: &WriteMode) -> Result<FileReport> {
        let content = fs::read_to_string(path)?;
        let (output, mut report) = self.process_content(path, &content)?;

        match mode {
            WriteMode::DryRun => {}
            WriteMode::InPlace => {
                let backup = create_backup(path, self.config.backup)?;
                write_atomic(path, &output)?;
                report.backup = Some(backup.display().to_string());
                report.output = Some(path.display().to_string());
            }
            WriteMode::To(dir) => {
                let name = path
                    .file_name()
                    .ok_or_else(|| Error::invalid_input(format!("{} has no file name", path.display())))?;
                fs::create_dir_all(dir)?;
                let target = dir.join(name);
                // Any spelling of the source directory, symlinks included.
                if target.exists() && fs::canonicalize(&target)? == fs::canonicalize(path)? {
                    return Err(Error::invalid_input(format!(
                        "output would overwrite {} without a backup",
                        path.display()
                    )));
                }
                write_atomic(&target, &output)?;
                report.output = Some(target.display().to_string());
            }
        }

        log::info!(
            "{}: {} records, {} -> {} entities ({:.1}% unchanged)",
            path.display(),
            report.records,
            report.stats.entities_before,
            report.stats.entities_after,
            report.accuracy
        );
        Ok(report)
    }

    /// Discover files under `paths` and process each. Per-file failures are
    /// collected in the report.
    pub fn run(&self, paths: &[PathBuf], mode: &WriteMode) -> Result<AuditReport> {
        let files = discover_files(paths)?;
        if files.is_empty() {
            return Err(Error::invalid_input("no .jsonl files found"));
        }

        let results = self.process_all(&files, mode);

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    log::error!("{}: {}", path.display(), e);
                    failures.push(FileFailure {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(AuditReport::new(self.config.profile, mode.as_str(), reports, failures))
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, files: &[PathBuf], mode: &WriteMode) -> Vec<Result<FileReport>> {
        use rayon::prelude::*;
        files.par_iter().map(|p| self.process_file(p, mode)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, files: &[PathBuf], mode: &WriteMode) -> Vec<Result<FileReport>> {
        files.iter().map(|p| self.process_file(p, mode)).collect()
    }
}

/// Expand `paths` into a sorted, de-duplicated list of `.jsonl` files.
///
/// Directories are searched recursively; backups are skipped. Plain file
/// paths are kept as given, even if missing, so the failure is reported
/// against that file.
pub fn discover_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let root = glob::Pattern::escape(&path.to_string_lossy());
            let pattern = format!("{}/**/*.jsonl", root);
            let entries = glob::glob(&pattern)
                .map_err(|e| Error::invalid_input(format!("bad glob {}: {}", pattern, e)))?;
            for entry in entries {
                let entry = entry.map_err(|e| Error::Io(std::io::Error::from(e)))?;
                if !is_backup(&entry) {
                    files.push(entry);
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_backup(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(".backup"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "{\"text\": \"Reconnect 192.168.1.1/24 now\", \"entities\": [[10, 24, \"IP_ADDRESS\"]]}\n",
        "{\"text\": \"foo\", \"entities\": [[0,3\n",
        "{\"text\": \"Security incident response\", \"entities\": [[0, 8, \"SECURITY_TYPE\"]]}\n",
    );

    #[test]
    fn content_pipeline() {
        let auditor = Auditor::new(AuditConfig::default()).unwrap();
        let (out, report) = auditor
            .process_content(Path::new("x_entities.jsonl"), SAMPLE)
            .unwrap();
        assert_eq!(report.lines, 3);
        assert_eq!(report.records, 2);
        assert_eq!(report.parse_errors.len(), 1);
        assert_eq!(report.parse_errors[0].line, 2);
        assert_eq!(report.changed_records, 2);
        assert_eq!(report.stats.repaired, 1);
        assert_eq!(report.stats.removed, 1);
        assert_eq!(
            out,
            concat!(
                "{\"text\":\"Reconnect 192.168.1.1/24 now\",\"entities\":[[10,21,\"IP_ADDRESS\"]]}\n",
                "{\"text\":\"Security incident response\",\"entities\":[]}\n",
            )
        );
    }

    #[test]
    fn discovery_skips_backups_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("apt");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("apt_intent.jsonl"), "").unwrap();
        fs::write(sub.join("apt_entities.jsonl"), "").unwrap();
        fs::write(sub.join("apt_entities.jsonl.backup_20240101_000000"), "").unwrap();
        fs::write(sub.join("notes.txt"), "").unwrap();

        let files = discover_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["apt_entities.jsonl", "apt_intent.jsonl"]);
    }

    #[test]
    fn missing_file_is_a_failure_not_an_abort() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.jsonl");
        fs::write(&good, "{\"text\":\"a\"}\n").unwrap();
        let auditor = Auditor::new(AuditConfig::default()).unwrap();
        let report = auditor
            .run(&[good, dir.path().join("missing.jsonl")], &WriteMode::DryRun)
            .unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn output_dir_leaves_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("x_entities.jsonl");
        fs::write(&input, SAMPLE).unwrap();
        let out_dir = dir.path().join("fixed");
        let auditor = Auditor::new(AuditConfig::default()).unwrap();
        let report = auditor.process_file(&input, &WriteMode::To(out_dir.clone())).unwrap();
        assert_eq!(fs::read_to_string(&input).unwrap(), SAMPLE);
        assert!(report.backup.is_none());
        let written = fs::read_to_string(out_dir.join("x_entities.jsonl")).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
