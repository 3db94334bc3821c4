//! Span validation.
//!
//! [`SpanValidator`] decides whether one `(start, end, label)` over a text is
//! acceptable as-is. It never mutates anything; reshaping is the
//! [`SpanRepairer`](crate::repair::SpanRepairer)'s job.
//!
//! Checks run in a fixed order:
//!
//! 1. boundary sanity (`0 <= start < end <= len`); on failure nothing else runs
//! 2. no leading/trailing whitespace
//! 3. minimum length, except for labels with legitimate short forms
//! 4. no word character immediately outside either edge
//! 5. common-word and label-specific denylists
//! 6. full match against the label's pattern, if it has one
//! 7. not punctuation-only
//!
//! Every failing check contributes its [`IssueCode`]; a label missing from
//! the catalog is an issue or a warning depending on [`UnknownLabelPolicy`].

use crate::config::UnknownLabelPolicy;
use crate::denylist::Denylist;
use crate::offset::{char_at, char_before, SpanConverter};
use crate::patterns::PatternRegistry;
use crate::types::{Catalog, IssueCode, Span};
use serde::Serialize;
use std::collections::BTreeSet;

/// Labels exempt from the minimum-length floor.
pub const SHORT_FORM_LABELS: &[&str] = &[
    "IP_ADDRESS",
    "DOMAIN",
    "CVE_ID",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "GITHUB_ISSUE",
];

/// Default minimum span length in characters (after trimming).
pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Scalar validation knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum trimmed length in characters.
    pub min_length: usize,
    /// Labels exempt from `min_length`.
    pub short_label_exemptions: BTreeSet<String>,
    /// What to do with labels missing from the catalog.
    pub unknown_labels: UnknownLabelPolicy,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            short_label_exemptions: SHORT_FORM_LABELS.iter().map(|s| (*s).to_string()).collect(),
            unknown_labels: UnknownLabelPolicy::default(),
        }
    }
}

/// Result of validating one span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Failed checks. Empty means valid.
    pub issues: BTreeSet<IssueCode>,
    /// Non-fatal findings (unknown label under the warn policy).
    pub warnings: BTreeSet<IssueCode>,
}

impl Validation {
    /// No failed checks.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Did `code` fail?
    #[must_use]
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.contains(&code)
    }

    /// Every issue can be addressed by re-anchoring.
    #[must_use]
    pub fn is_repairable(&self) -> bool {
        !self.issues.is_empty() && self.issues.iter().all(|c| c.is_repairable())
    }

    /// Whitespace is among the issues.
    #[must_use]
    pub fn has_whitespace_issue(&self) -> bool {
        self.issues.iter().any(|c| c.is_whitespace())
    }

    fn fail(&mut self, code: IssueCode) {
        self.issues.insert(code);
    }
}

/// Validates spans against a pattern registry, denylist and catalog.
///
/// Borrowing its collaborators keeps construction free: build the owned
/// objects once per configuration and create validators as needed.
#[derive(Debug, Clone, Copy)]
pub struct SpanValidator<'a> {
    patterns: &'a PatternRegistry,
    denylist: &'a Denylist,
    catalog: &'a Catalog,
    rules: &'a ValidationRules,
}

impl<'a> SpanValidator<'a> {
    /// Create a validator.
    #[must_use]
    pub fn new(
        patterns: &'a PatternRegistry,
        denylist: &'a Denylist,
        catalog: &'a Catalog,
        rules: &'a ValidationRules,
    ) -> Self {
        Self {
            patterns,
            denylist,
            catalog,
            rules,
        }
    }

    /// The pattern registry in use.
    #[must_use]
    pub fn patterns(&self) -> &'a PatternRegistry {
        self.patterns
    }

    /// Validate `span` over `text`.
    ///
    /// ```
    /// use spanguard::{AuditConfig, IssueCode, Span};
    ///
    /// let config = AuditConfig::default();
    /// let toolkit = config.toolkit().unwrap();
    /// let validator = toolkit.validator();
    ///
    /// let text = "Reconnect 192.168.1.1/24 now";
    /// assert!(validator.validate(text, &Span::new(10, 21, "IP_ADDRESS")).is_valid());
    ///
    /// let v = validator.validate(text, &Span::new(10, 24, "IP_ADDRESS"));
    /// assert!(v.has(IssueCode::InvalidPattern));
    /// ```
    #[must_use]
    pub fn validate(&self, text: &str, span: &Span) -> Validation {
        self.validate_with(text, &SpanConverter::new(text), span)
    }

    /// [`validate`](Self::validate) with a converter precomputed for `text`.
    #[must_use]
    pub fn validate_with(&self, text: &str, conv: &SpanConverter, span: &Span) -> Validation {
        let mut v = Validation::default();

        if !self.catalog.is_entity_label(&span.label) {
            match self.rules.unknown_labels {
                UnknownLabelPolicy::Drop => v.fail(IssueCode::UnknownLabel),
                UnknownLabelPolicy::Warn => {
                    v.warnings.insert(IssueCode::UnknownLabel);
                }
            }
        }

        // 1. Boundary sanity
        if span.start < 0 || span.end < 0 || span.start >= span.end || span.end as usize > conv.char_len() {
            v.fail(IssueCode::InvalidBoundary);
            return v;
        }
        let (start, end) = (span.start as usize, span.end as usize);
        let text_span = conv.from_chars(start, end);
        let surface = text_span.extract(text);

        // 2. Whitespace
        if surface.starts_with(char::is_whitespace) {
            v.fail(IssueCode::LeadingWhitespace);
        }
        if surface.ends_with(char::is_whitespace) {
            v.fail(IssueCode::TrailingWhitespace);
        }
        let trimmed = surface.trim();

        // 3. Length
        if trimmed.chars().count() < self.rules.min_length
            && !self.rules.short_label_exemptions.contains(&span.label)
        {
            v.fail(IssueCode::TooShort);
        }

        // 4. Mid-word cut
        let cuts_before = char_before(text, text_span.byte_start).is_some_and(is_word_char);
        let cuts_after = char_at(text, text_span.byte_end).is_some_and(is_word_char);
        if cuts_before || cuts_after {
            v.fail(IssueCode::PartialWord);
        }

        // 5. Denylists
        if self.denylist.is_denylisted(trimmed) {
            v.fail(IssueCode::CommonWord);
        }
        if self.denylist.is_problematic(&span.label, trimmed) {
            v.fail(IssueCode::ProblematicLabel);
        }

        // 6. Pattern
        if let Some(entry) = self.patterns.get(&span.label) {
            if !entry.full_match(surface) {
                v.fail(IssueCode::InvalidPattern);
            }
        }

        // 7. Punctuation-only
        if trimmed.chars().all(is_punctuation_like) {
            v.fail(IssueCode::PunctuationOnly);
        }

        v
    }
}

/// Characters that continue a word.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Punctuation, whitespace, and typographic quotes/dashes.
///
/// Symbols outside these classes (emoji, currency, math) count as content.
#[must_use]
pub fn is_punctuation_like(c: char) -> bool {
    c.is_ascii_punctuation()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2013}' | '\u{2014}'
                | '\u{2026}' | '\u{00AB}' | '\u{00BB}' | '\u{00B7}' | '\u{00A1}' | '\u{00BF}'
        )
}
