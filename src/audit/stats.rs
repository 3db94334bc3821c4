//! Audit counters and reports.

use crate::config::Profile;
use crate::intent::IntentStats;
use crate::types::{IssueCode, RecordKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Per-label span counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    /// Spans in the input.
    pub before: usize,
    /// Spans in the output.
    pub after: usize,
    /// Spans kept byte-for-byte.
    pub unchanged: usize,
    /// Spans fixed by trimming whitespace.
    pub trimmed: usize,
    /// Spans re-anchored to a pattern match.
    pub repaired: usize,
    /// Spans dropped.
    pub removed: usize,
}

impl LabelStats {
    fn merge(&mut self, other: &LabelStats) {
        self.before += other.before;
        self.after += other.after;
        self.unchanged += other.unchanged;
        self.trimmed += other.trimmed;
        self.repaired += other.repaired;
        self.removed += other.removed;
    }
}

/// Counters for one record, or any aggregate of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    /// Spans in the input.
    pub entities_before: usize,
    /// Spans in the output.
    pub entities_after: usize,
    /// Spans kept as-is.
    pub unchanged: usize,
    /// Spans fixed by trimming.
    pub trimmed: usize,
    /// Spans re-anchored.
    pub repaired: usize,
    /// Spans dropped (validation or overlap).
    pub removed: usize,
    /// Failed checks, one count per (span, issue).
    pub issues: BTreeMap<IssueCode, usize>,
    /// Non-fatal findings.
    pub warnings: BTreeMap<IssueCode, usize>,
    /// Breakdown by label.
    pub labels: BTreeMap<String, LabelStats>,
    /// Intent binarization.
    pub intents: IntentStats,
}

impl RecordStats {
    /// Accumulate another set of counters.
    pub fn merge(&mut self, other: &RecordStats) {
        self.entities_before += other.entities_before;
        self.entities_after += other.entities_after;
        self.unchanged += other.unchanged;
        self.trimmed += other.trimmed;
        self.repaired += other.repaired;
        self.removed += other.removed;
        for (code, n) in &other.issues {
            *self.issues.entry(*code).or_insert(0) += n;
        }
        for (code, n) in &other.warnings {
            *self.warnings.entry(*code).or_insert(0) += n;
        }
        for (label, stats) in &other.labels {
            self.labels.entry(label.clone()).or_default().merge(stats);
        }
        self.intents.merge(&other.intents);
    }

    /// Count one issue.
    pub fn add_issue(&mut self, code: IssueCode) {
        *self.issues.entry(code).or_insert(0) += 1;
    }

    /// Count one warning.
    pub fn add_warning(&mut self, code: IssueCode) {
        *self.warnings.entry(code).or_insert(0) += 1;
    }

    /// Counters for `label`.
    pub fn label_mut(&mut self, label: &str) -> &mut LabelStats {
        self.labels.entry(label.to_string()).or_default()
    }

    /// Did anything change?
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.trimmed + self.repaired + self.removed + self.intents.changed + self.intents.dropped
            > 0
    }

    /// `unchanged / before * 100`, or 100 with no entities.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.unchanged, self.entities_before)
    }
}

fn accuracy(unchanged: usize, before: usize) -> f64 {
    if before == 0 {
        100.0
    } else {
        unchanged as f64 / before as f64 * 100.0
    }
}

/// A line that was not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// Decoder message.
    pub message: String,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Input path.
    pub path: String,
    /// Kind inferred from the file name, else from its records.
    pub kind: RecordKind,
    /// Non-blank lines.
    pub lines: usize,
    /// Records parsed.
    pub records: usize,
    /// Records whose output differs from the input.
    pub changed_records: usize,
    /// Unparseable lines.
    pub parse_errors: Vec<ParseError>,
    /// Span and intent counters.
    pub stats: RecordStats,
    /// Percentage of spans kept unchanged.
    pub accuracy: f64,
    /// Backup written before the rewrite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
    /// Where the fixed records were written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl FileReport {
    /// Empty report for `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            kind: RecordKind::from_path(path),
            lines: 0,
            records: 0,
            changed_records: 0,
            parse_errors: Vec::new(),
            stats: RecordStats::default(),
            accuracy: 100.0,
            backup: None,
            output: None,
        }
    }

    /// Recompute derived fields after counters change.
    pub fn finish(&mut self) {
        self.accuracy = self.stats.accuracy();
    }
}

/// A file that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Input path.
    pub path: String,
    /// Error message.
    pub error: String,
}

/// Result of one run over many files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    /// Profile in effect.
    pub profile: Profile,
    /// `dry-run`, `in-place` or `output`.
    pub mode: String,
    /// Files processed.
    pub files: Vec<FileReport>,
    /// Files that failed to process.
    pub failures: Vec<FileFailure>,
    /// Non-blank lines across files.
    pub lines: usize,
    /// Records across files.
    pub records: usize,
    /// Changed records across files.
    pub changed_records: usize,
    /// Parse errors across files.
    pub parse_errors: usize,
    /// Aggregate counters.
    pub totals: RecordStats,
    /// Aggregate accuracy.
    pub accuracy: f64,
}

impl AuditReport {
    /// Aggregate file reports.
    #[must_use]
    pub fn new(profile: Profile, mode: &str, files: Vec<FileReport>, failures: Vec<FileFailure>) -> Self {
        let mut totals = RecordStats::default();
        let (mut lines, mut records, mut changed, mut parse_errors) = (0, 0, 0, 0);
        for file in &files {
            totals.merge(&file.stats);
            lines += file.lines;
            records += file.records;
            changed += file.changed_records;
            parse_errors += file.parse_errors.len();
        }
        let accuracy = totals.accuracy();
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            profile,
            mode: mode.to_string(),
            files,
            failures,
            lines,
            records,
            changed_records: changed,
            parse_errors,
            totals,
            accuracy,
        }
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Any file failed outright.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
