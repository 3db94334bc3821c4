//! Overlap resolution.
//!
//! Greedy longest-first interval selection: sort by `(start, -len)` and sweep
//! once, accepting a span iff it starts at or after the end of the last
//! accepted one. The result is not a maximum-weight independent set.

use crate::types::Span;

/// Output of [`resolve_overlaps`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Pairwise non-overlapping spans, ordered by start.
    pub kept: Vec<Span>,
    /// Spans that lost to an earlier or longer one.
    pub dropped: Vec<Span>,
}

/// Remove overlaps, preferring earlier then longer spans.
///
/// Inputs are assumed individually valid (`start < end`). Ties on
/// `(start, len)` keep input order.
///
/// ```
/// use spanguard::overlap::resolve_overlaps;
/// use spanguard::Span;
///
/// let r = resolve_overlaps(vec![
///     Span::new(5, 20, "DOMAIN"),
///     Span::new(5, 30, "URL"),
/// ]);
/// assert_eq!(r.kept, vec![Span::new(5, 30, "URL")]);
/// assert_eq!(r.dropped, vec![Span::new(5, 20, "DOMAIN")]);
/// ```
#[must_use]
pub fn resolve_overlaps(spans: Vec<Span>) -> Resolution {
    let (kept, dropped) = resolve_overlaps_by(spans, |s| s);
    Resolution { kept, dropped }
}

/// [`resolve_overlaps`] over items that carry a span, returning
/// `(kept, dropped)`.
pub fn resolve_overlaps_by<T, F>(mut items: Vec<T>, span_of: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> &Span,
{
    items.sort_by_key(|item| {
        let s = span_of(item);
        (s.start, -(s.end - s.start))
    });

    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    let mut last_end = i64::MIN;
    for item in items {
        let span = span_of(&item);
        if span.start >= last_end {
            last_end = span.end;
            kept.push(item);
        } else {
            dropped.push(item);
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(resolve_overlaps(vec![]), Resolution::default());
    }

    #[test]
    fn disjoint_spans_sorted() {
        let r = resolve_overlaps(vec![Span::new(10, 12, "B"), Span::new(0, 4, "A")]);
        assert_eq!(r.kept, vec![Span::new(0, 4, "A"), Span::new(10, 12, "B")]);
        assert!(r.dropped.is_empty());
    }

    #[test]
    fn touching_spans_both_kept() {
        let r = resolve_overlaps(vec![Span::new(0, 4, "A"), Span::new(4, 8, "B")]);
        assert_eq!(r.kept.len(), 2);
    }

    #[test]
    fn earlier_start_beats_longer_later_span() {
        let r = resolve_overlaps(vec![Span::new(0, 6, "A"), Span::new(3, 30, "B")]);
        assert_eq!(r.kept, vec![Span::new(0, 6, "A")]);
    }

    #[test]
    fn nested_spans_dropped() {
        let r = resolve_overlaps(vec![
            Span::new(8, 12, "DOMAIN"),
            Span::new(0, 40, "URL"),
            Span::new(20, 25, "IP_ADDRESS"),
            Span::new(40, 45, "TOOL"),
        ]);
        assert_eq!(r.kept, vec![Span::new(0, 40, "URL"), Span::new(40, 45, "TOOL")]);
        assert_eq!(r.dropped.len(), 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let r = resolve_overlaps(vec![Span::new(0, 4, "FIRST"), Span::new(0, 4, "SECOND")]);
        assert_eq!(r.kept[0].label, "FIRST");
    }

    #[test]
    fn idempotent() {
        let r = resolve_overlaps(vec![
            Span::new(0, 10, "A"),
            Span::new(5, 15, "B"),
            Span::new(12, 20, "C"),
        ]);
        assert_eq!(resolve_overlaps(r.kept.clone()).kept, r.kept);
    }
}
