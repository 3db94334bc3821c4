//! Per-record processing.

use super::stats::RecordStats;
use crate::intent::binarize_intents;
use crate::offset::SpanConverter;
use crate::overlap::resolve_overlaps_by;
use crate::repair::SpanFix;
use crate::toolkit::Toolkit;
use crate::types::{IssueCode, Record, Span};

/// How a surviving span got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Survival {
    Unchanged,
    Trimmed,
    Repaired,
}

/// Clean one record: validate, repair and de-overlap its spans, binarize its
/// intents. Returns the fixed record and its counters.
///
/// A record whose entity list ends up empty is kept with an empty list.
#[must_use]
pub fn process_record(toolkit: &Toolkit, record: &Record) -> (Record, RecordStats) {
    let mut stats = RecordStats::default();
    let mut fixed = record.clone();

    if let Some(entities) = record.entities.as_deref() {
        fixed.entities = Some(process_entities(toolkit, &record.text, entities, &mut stats));
    }

    if let Some(intents) = fixed.intent_map_mut() {
        stats.intents = binarize_intents(intents, toolkit.catalog(), toolkit.intent_policy());
    }

    (fixed, stats)
}

fn process_entities(
    toolkit: &Toolkit,
    text: &str,
    entities: &[Span],
    stats: &mut RecordStats,
) -> Vec<Span> {
    let conv = SpanConverter::new(text);
    let repairer = toolkit.repairer();
    stats.entities_before = entities.len();

    let mut survivors = Vec::with_capacity(entities.len());
    for span in entities {
        stats.label_mut(&span.label).before += 1;

        let (fix, validation) = repairer.fix(text, &conv, span);
        for code in &validation.issues {
            stats.add_issue(*code);
        }
        for code in &validation.warnings {
            stats.add_warning(*code);
        }

        let survival = match fix {
            SpanFix::Kept(s) => Some((s, Survival::Unchanged)),
            SpanFix::Trimmed(s) => Some((s, Survival::Trimmed)),
            SpanFix::Repaired(s) => Some((s, Survival::Repaired)),
            SpanFix::Removed(issues) => {
                log::trace!(
                    "removed {} [{}, {}): {:?}",
                    span.label,
                    span.start,
                    span.end,
                    issues
                );
                None
            }
        };
        match survival {
            Some(item) => survivors.push(item),
            None => {
                stats.removed += 1;
                stats.label_mut(&span.label).removed += 1;
            }
        }
    }

    let (kept, dropped) = resolve_overlaps_by(survivors, |(s, _)| s);
    for (span, _) in &dropped {
        stats.add_issue(IssueCode::Overlap);
        stats.removed += 1;
        stats.label_mut(&span.label).removed += 1;
    }

    let mut out = Vec::with_capacity(kept.len());
    for (span, survival) in kept {
        let label = stats.label_mut(&span.label);
        label.after += 1;
        match survival {
            Survival::Unchanged => label.unchanged += 1,
            Survival::Trimmed => label.trimmed += 1,
            Survival::Repaired => label.repaired += 1,
        }
        match survival {
            Survival::Unchanged => stats.unchanged += 1,
            Survival::Trimmed => stats.trimmed += 1,
            Survival::Repaired => stats.repaired += 1,
        }
        out.push(span);
    }
    stats.entities_after = out.len();
    out
}
