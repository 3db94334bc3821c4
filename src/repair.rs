//! Span repair.
//!
//! A span that fails validation gets one of three treatments:
//!
//! - **trim**: strip leading/trailing whitespace and re-validate. Applies to
//!   every label.
//! - **re-anchor**: for closed-form labels only, search a window around the
//!   span for actual pattern matches and move the span onto the nearest one
//!   that validates.
//! - **remove**: everything else, including boundary-sanity failures and
//!   denylist hits.
//!
//! Open-vocabulary labels are never extended or snapped to word boundaries:
//! without a pattern there is nothing to repair against.

use crate::offset::SpanConverter;
use crate::types::{IssueCode, Span};
use crate::validate::{SpanValidator, Validation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default search radius around the original span, in characters.
pub const DEFAULT_REPAIR_WINDOW: usize = 50;

/// Default endpoint tolerance for non-overlapping candidates, in characters.
pub const DEFAULT_REPAIR_TOLERANCE: usize = 15;

/// Repair knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairSettings {
    /// Re-anchoring enabled. Trimming always runs.
    pub enabled: bool,
    /// Search radius in characters.
    pub window: usize,
    /// Max endpoint distance for candidates that do not overlap the span.
    pub tolerance: usize,
}

impl Default for RepairSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            window: DEFAULT_REPAIR_WINDOW,
            tolerance: DEFAULT_REPAIR_TOLERANCE,
        }
    }
}

/// What happened to one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanFix {
    /// Valid as-is.
    Kept(Span),
    /// Whitespace stripped.
    Trimmed(Span),
    /// Moved onto a pattern match.
    Repaired(Span),
    /// Dropped with the issues that condemned it.
    Removed(BTreeSet<IssueCode>),
}

impl SpanFix {
    /// The surviving span, if any.
    #[must_use]
    pub fn span(&self) -> Option<&Span> {
        match self {
            SpanFix::Kept(s) | SpanFix::Trimmed(s) | SpanFix::Repaired(s) => Some(s),
            SpanFix::Removed(_) => None,
        }
    }

    /// Consume into the surviving span.
    #[must_use]
    pub fn into_span(self) -> Option<Span> {
        match self {
            SpanFix::Kept(s) | SpanFix::Trimmed(s) | SpanFix::Repaired(s) => Some(s),
            SpanFix::Removed(_) => None,
        }
    }

    /// Short name for reports and CLI output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SpanFix::Kept(_) => "kept",
            SpanFix::Trimmed(_) => "trimmed",
            SpanFix::Repaired(_) => "repaired",
            SpanFix::Removed(_) => "removed",
        }
    }
}

/// Trims and re-anchors invalid spans.
#[derive(Debug, Clone, Copy)]
pub struct SpanRepairer<'a> {
    validator: SpanValidator<'a>,
    settings: RepairSettings,
}

impl<'a> SpanRepairer<'a> {
    /// Create a repairer on top of a validator.
    #[must_use]
    pub fn new(validator: SpanValidator<'a>, settings: RepairSettings) -> Self {
        Self {
            validator,
            settings,
        }
    }

    /// The underlying validator.
    #[must_use]
    pub fn validator(&self) -> &SpanValidator<'a> {
        &self.validator
    }

    /// Validate, then trim or re-anchor as needed.
    ///
    /// Returns the outcome together with the original span's validation.
    #[must_use]
    pub fn fix(&self, text: &str, conv: &SpanConverter, span: &Span) -> (SpanFix, Validation) {
        let validation = self.validator.validate_with(text, conv, span);
        if validation.is_valid() {
            return (SpanFix::Kept(span.clone()), validation);
        }
        if !validation.is_repairable() {
            return (SpanFix::Removed(validation.issues.clone()), validation);
        }

        if validation.has_whitespace_issue() {
            if let Some(trimmed) = self.trim(text, conv, span) {
                if self.validator.validate_with(text, conv, &trimmed).is_valid() {
                    return (SpanFix::Trimmed(trimmed), validation);
                }
            }
        }

        if self.settings.enabled && self.validator.patterns().is_closed_form(&span.label) {
            if let Some(repaired) = self.reanchor(text, conv, span) {
                log::debug!(
                    "re-anchored {} [{}, {}) -> [{}, {})",
                    span.label,
                    span.start,
                    span.end,
                    repaired.start,
                    repaired.end
                );
                return (SpanFix::Repaired(repaired), validation);
            }
        }

        (SpanFix::Removed(validation.issues.clone()), validation)
    }

    /// Strip leading and trailing whitespace. `None` if nothing is left or
    /// the offsets are out of range.
    #[must_use]
    pub fn trim(&self, text: &str, conv: &SpanConverter, span: &Span) -> Option<Span> {
        if span.start < 0 || span.start >= span.end || span.end as usize > conv.char_len() {
            return None;
        }
        let surface = conv.from_chars(span.start as usize, span.end as usize).extract(text);
        let leading = surface.chars().take_while(|c| c.is_whitespace()).count() as i64;
        let trailing = surface.chars().rev().take_while(|c| c.is_whitespace()).count() as i64;
        let start = span.start + leading;
        let end = span.end - trailing;
        (start < end).then(|| Span::new(start, end, span.label.clone()))
    }

    /// Nearest pattern match around `span` that passes validation.
    ///
    /// Candidates are matches inside `[start - window, end + window)` that
    /// overlap the span or lie within `tolerance` of both endpoints. They are
    /// tried by ascending `|Δstart| + |Δend|`, then by earliest start.
    #[must_use]
    pub fn reanchor(&self, text: &str, conv: &SpanConverter, span: &Span) -> Option<Span> {
        let entry = self.validator.patterns().get(&span.label)?;
        if span.start < 0 || span.start >= span.end || span.end as usize > conv.char_len() {
            return None;
        }

        let (start, end) = (span.start as usize, span.end as usize);
        let win_start = start.saturating_sub(self.settings.window);
        let win_end = (end + self.settings.window).min(conv.char_len());
        let win = conv.from_chars(win_start, win_end);
        let haystack = win.extract(text);

        let tolerance = self.settings.tolerance as i64;
        let mut candidates: Vec<(i64, Span)> = entry
            .find_iter(haystack)
            .filter(|m| m.start() < m.end())
            .map(|m| {
                let s = conv.byte_to_char(win.byte_start + m.start()) as i64;
                let e = conv.byte_to_char(win.byte_start + m.end()) as i64;
                Span::new(s, e, span.label.clone())
            })
            .filter(|c| {
                c.overlaps(span)
                    || ((c.start - span.start).abs() <= tolerance
                        && (c.end - span.end).abs() <= tolerance)
            })
            .map(|c| ((c.start - span.start).abs() + (c.end - span.end).abs(), c))
            .collect();
        candidates.sort_by_key(|(distance, c)| (*distance, c.start));

        candidates
            .into_iter()
            .map(|(_, c)| c)
            .find(|c| self.validator.validate_with(text, conv, c).is_valid())
    }
}
