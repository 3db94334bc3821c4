//! Token alignment preflight.
//!
//! The downstream trainer re-derives token spans from character offsets and
//! silently drops (or reshapes) any span whose edges do not fall on token
//! boundaries. This module reproduces that step with a simple tokenizer so
//! an audit can count the casualties before conversion.
//!
//! Tokenization: split on whitespace, then peel leading and trailing
//! punctuation off each chunk one character at a time.
//!
//! ```text
//! Text:    "Block evil.example.com, now"
//! Tokens:  [Block] [evil.example.com] [,] [now]
//! ```

use crate::types::{Record, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a non-aligned span is treated, mirroring the trainer's policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Both edges must fall on token boundaries; otherwise the span is lost.
    #[default]
    Strict,
    /// Shrink to the tokens fully inside the span.
    Contract,
    /// Grow to every token the span touches.
    Expand,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlignmentMode::Strict => "strict",
            AlignmentMode::Contract => "contract",
            AlignmentMode::Expand => "expand",
        })
    }
}

/// Character offsets of each token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOffsets {
    offsets: Vec<(usize, usize)>,
}

impl TokenOffsets {
    /// Tokenize `text`.
    #[must_use]
    pub fn tokenize(text: &str) -> Self {
        let mut offsets = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            push_chunk(&chars, start, i, &mut offsets);
        }
        Self { offsets }
    }

    /// Token count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// No tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Character span of token `idx`.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<(usize, usize)> {
        self.offsets.get(idx).copied()
    }

    /// Tokens overlapping `[start, end)`, as `(first, last_exclusive)`.
    #[must_use]
    pub fn overlapping(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let mut first = None;
        let mut last = 0;
        for (idx, &(ts, te)) in self.offsets.iter().enumerate() {
            if te > start && ts < end {
                first.get_or_insert(idx);
                last = idx + 1;
            }
        }
        first.map(|f| (f, last))
    }

    /// Tokens fully inside `[start, end)`, as `(first, last_exclusive)`.
    #[must_use]
    pub fn contained(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let mut first = None;
        let mut last = 0;
        for (idx, &(ts, te)) in self.offsets.iter().enumerate() {
            if ts >= start && te <= end {
                first.get_or_insert(idx);
                last = idx + 1;
            }
        }
        first.map(|f| (f, last))
    }

    /// Character span covered by tokens `[first, last)`.
    #[must_use]
    pub fn tokens_to_chars(&self, first: usize, last: usize) -> Option<(usize, usize)> {
        if first >= last || last > self.offsets.len() {
            return None;
        }
        Some((self.offsets[first].0, self.offsets[last - 1].1))
    }
}

fn push_chunk(chars: &[char], mut start: usize, mut end: usize, out: &mut Vec<(usize, usize)>) {
    let mut suffix = Vec::new();
    while start < end && is_peelable(chars[start]) {
        out.push((start, start + 1));
        start += 1;
    }
    while end > start && is_peelable(chars[end - 1]) {
        suffix.push((end - 1, end));
        end -= 1;
    }
    if start < end {
        out.push((start, end));
    }
    out.extend(suffix.into_iter().rev());
}

fn is_peelable(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'' | '(' | ')' | '[' | ']' | '{' | '}' | '<'
            | '>' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'
    )
}

/// What alignment did to one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    /// Edges already on token boundaries.
    Exact,
    /// Moved to `(start, end)` by contraction or expansion.
    Reshaped(usize, usize),
    /// The trainer would drop it.
    Dropped,
}

/// Align one span to `tokens` under `mode`.
///
/// ```
/// use spanguard::align::{align_span, Alignment, AlignmentMode, TokenOffsets};
/// use spanguard::Span;
///
/// let text = "Block evil.example.com, now";
/// let tokens = TokenOffsets::tokenize(text);
/// let span = Span::new(6, 22, "DOMAIN");
/// assert_eq!(align_span(&tokens, &span, AlignmentMode::Strict), Alignment::Exact);
///
/// let partial = Span::new(6, 10, "DOMAIN");
/// assert_eq!(align_span(&tokens, &partial, AlignmentMode::Strict), Alignment::Dropped);
/// assert_eq!(
///     align_span(&tokens, &partial, AlignmentMode::Expand),
///     Alignment::Reshaped(6, 22)
/// );
/// ```
#[must_use]
pub fn align_span(tokens: &TokenOffsets, span: &Span, mode: AlignmentMode) -> Alignment {
    if span.start < 0 || span.start >= span.end {
        return Alignment::Dropped;
    }
    let (start, end) = (span.start as usize, span.end as usize);

    let exact = tokens.offsets.iter().any(|&(s, _)| s == start)
        && tokens.offsets.iter().any(|&(_, e)| e == end);
    if exact {
        return Alignment::Exact;
    }

    let range = match mode {
        AlignmentMode::Strict => None,
        AlignmentMode::Contract => tokens.contained(start, end),
        AlignmentMode::Expand => tokens.overlapping(start, end),
    };
    match range.and_then(|(first, last)| tokens.tokens_to_chars(first, last)) {
        Some((s, e)) => Alignment::Reshaped(s, e),
        None => Alignment::Dropped,
    }
}

/// Alignment counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignSummary {
    /// Spans examined.
    pub spans: usize,
    /// Already aligned.
    pub exact: usize,
    /// Would be contracted or expanded.
    pub reshaped: usize,
    /// Would be dropped.
    pub dropped: usize,
}

impl AlignSummary {
    /// Count one record's spans.
    pub fn add_record(&mut self, record: &Record, mode: AlignmentMode) {
        let Some(entities) = record.entities.as_deref() else {
            return;
        };
        let tokens = TokenOffsets::tokenize(&record.text);
        for span in entities {
            self.spans += 1;
            match align_span(&tokens, span, mode) {
                Alignment::Exact => self.exact += 1,
                Alignment::Reshaped(..) => self.reshaped += 1,
                Alignment::Dropped => self.dropped += 1,
            }
        }
    }

    /// Accumulate another summary.
    pub fn merge(&mut self, other: &AlignSummary) {
        self.spans += other.spans;
        self.exact += other.exact;
        self.reshaped += other.reshaped;
        self.dropped += other.dropped;
    }

    /// Percentage of spans that survive unchanged.
    #[must_use]
    pub fn exact_rate(&self) -> f64 {
        if self.spans == 0 {
            100.0
        } else {
            self.exact as f64 / self.spans as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str) -> Vec<String> {
        let tokens = TokenOffsets::tokenize(text);
        let chars: Vec<char> = text.chars().collect();
        (0..tokens.len())
            .filter_map(|i| tokens.get(i))
            .map(|(s, e)| chars[s..e].iter().collect())
            .collect()
    }

    #[test]
    fn peels_punctuation() {
        assert_eq!(
            surfaces("(see CVE-2021-44228), now."),
            vec!["(", "see", "CVE-2021-44228", ")", ",", "now", "."]
        );
    }

    #[test]
    fn keeps_interior_punctuation() {
        assert_eq!(surfaces("ping 10.0.0.1/24"), vec!["ping", "10.0.0.1/24"]);
    }

    #[test]
    fn all_punctuation_chunk() {
        assert_eq!(surfaces("a ... b"), vec!["a", ".", ".", ".", "b"]);
    }

    #[test]
    fn non_ascii_offsets_are_chars() {
        let tokens = TokenOffsets::tokenize("C2 → 10.0.0.5");
        assert_eq!(tokens.get(2), Some((5, 13)));
    }

    #[test]
    fn contract_mode() {
        let tokens = TokenOffsets::tokenize("ping 10.0.0.1/24 now");
        // Span covers "ping 10" + part of the next token.
        let span = Span::new(0, 7, "X");
        assert_eq!(align_span(&tokens, &span, AlignmentMode::Contract), Alignment::Reshaped(0, 4));
        let inside = Span::new(5, 13, "IP_ADDRESS");
        assert_eq!(align_span(&tokens, &inside, AlignmentMode::Contract), Alignment::Dropped);
    }

    #[test]
    fn invalid_span_dropped() {
        let tokens = TokenOffsets::tokenize("abc");
        assert_eq!(align_span(&tokens, &Span::new(2, 2, "X"), AlignmentMode::Expand), Alignment::Dropped);
    }

    #[test]
    fn summary_counts() {
        let record = Record::with_entities(
            "ping 10.0.0.1/24 now",
            vec![Span::new(0, 4, "TOOL"), Span::new(5, 13, "IP_ADDRESS")],
        );
        let mut summary = AlignSummary::default();
        summary.add_record(&record, AlignmentMode::Strict);
        assert_eq!(summary, AlignSummary { spans: 2, exact: 1, reshaped: 0, dropped: 1 });
        assert!((summary.exact_rate() - 50.0).abs() < 1e-9);
    }
}
