//! Span defect codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reason a span was rejected, reshaped, or flagged.
///
/// Serialized in `SCREAMING_SNAKE_CASE`, which is also how reports key their
/// per-issue counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Offsets out of range, negative, or `start >= end`.
    InvalidBoundary,
    /// Span text starts with whitespace.
    LeadingWhitespace,
    /// Span text ends with whitespace.
    TrailingWhitespace,
    /// Shorter than the minimum length for its label.
    TooShort,
    /// Boundary falls inside a word.
    PartialWord,
    /// Span text is a denylisted common word.
    CommonWord,
    /// Label is never valid for this token.
    ProblematicLabel,
    /// Closed-form label whose text does not fully match its pattern.
    InvalidPattern,
    /// Nothing but punctuation/whitespace.
    PunctuationOnly,
    /// Label not in the entity catalog.
    UnknownLabel,
    /// Lost overlap resolution against another span.
    Overlap,
}

impl IssueCode {
    /// All codes, in check order.
    pub const ALL: [IssueCode; 11] = [
        IssueCode::InvalidBoundary,
        IssueCode::LeadingWhitespace,
        IssueCode::TrailingWhitespace,
        IssueCode::TooShort,
        IssueCode::PartialWord,
        IssueCode::CommonWord,
        IssueCode::ProblematicLabel,
        IssueCode::InvalidPattern,
        IssueCode::PunctuationOnly,
        IssueCode::UnknownLabel,
        IssueCode::Overlap,
    ];

    /// Stable report key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidBoundary => "INVALID_BOUNDARY",
            IssueCode::LeadingWhitespace => "LEADING_WHITESPACE",
            IssueCode::TrailingWhitespace => "TRAILING_WHITESPACE",
            IssueCode::TooShort => "TOO_SHORT",
            IssueCode::PartialWord => "PARTIAL_WORD",
            IssueCode::CommonWord => "COMMON_WORD",
            IssueCode::ProblematicLabel => "PROBLEMATIC_LABEL",
            IssueCode::InvalidPattern => "INVALID_PATTERN",
            IssueCode::PunctuationOnly => "PUNCTUATION_ONLY",
            IssueCode::UnknownLabel => "UNKNOWN_LABEL",
            IssueCode::Overlap => "OVERLAP",
        }
    }

    /// Whether whitespace trimming alone can fix this issue.
    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        matches!(
            self,
            IssueCode::LeadingWhitespace | IssueCode::TrailingWhitespace
        )
    }

    /// Whether re-anchoring to a pattern match may fix this issue.
    ///
    /// Boundary-sanity, denylist and catalog failures are never repaired.
    #[must_use]
    pub const fn is_repairable(self) -> bool {
        matches!(
            self,
            IssueCode::LeadingWhitespace
                | IssueCode::TrailingWhitespace
                | IssueCode::TooShort
                | IssueCode::PartialWord
                | IssueCode::InvalidPattern
                | IssueCode::PunctuationOnly
        )
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
