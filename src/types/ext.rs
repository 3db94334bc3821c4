//! Extension traits for span collections.

use super::Span;
use std::collections::BTreeMap;

/// Extension methods for slices of spans.
///
/// ```rust
/// use spanguard::types::{Span, SpanSliceExt};
///
/// let spans = vec![
///     Span::new(0, 8, "THREAT_ACTOR"),
///     Span::new(20, 31, "IP_ADDRESS"),
///     Span::new(25, 31, "DOMAIN"),
/// ];
///
/// assert!(spans.has_overlaps());
/// assert_eq!(spans.overlapping_pairs().len(), 1);
/// assert_eq!(spans.of_label("IP_ADDRESS").count(), 1);
/// ```
pub trait SpanSliceExt {
    /// Spans carrying `label`.
    fn of_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Span>;

    /// Check if any two spans overlap.
    fn has_overlaps(&self) -> bool;

    /// All overlapping pairs, in input order.
    fn overlapping_pairs(&self) -> Vec<(&Span, &Span)>;

    /// Spans sorted by `(start, end)`.
    fn sorted_by_position(&self) -> Vec<&Span>;

    /// Count spans per label.
    fn label_counts(&self) -> BTreeMap<String, usize>;

    /// Check if a character position falls within any span.
    fn contains_position(&self, pos: i64) -> bool;
}

impl SpanSliceExt for [Span] {
    fn of_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Span> {
        self.iter().filter(move |s| s.label == label)
    }

    fn has_overlaps(&self) -> bool {
        let mut max_end = i64::MIN;
        for span in self.sorted_by_position() {
            if span.start < max_end {
                return true;
            }
            max_end = max_end.max(span.end);
        }
        false
    }

    fn overlapping_pairs(&self) -> Vec<(&Span, &Span)> {
        let mut pairs = Vec::new();
        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                if self[i].overlaps(&self[j]) {
                    pairs.push((&self[i], &self[j]));
                }
            }
        }
        pairs
    }

    fn sorted_by_position(&self) -> Vec<&Span> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by_key(|s| (s.start, s.end));
        sorted
    }

    fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for span in self {
            *counts.entry(span.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn contains_position(&self, pos: i64) -> bool {
        self.iter().any(|s| pos >= s.start && pos < s.end)
    }
}
