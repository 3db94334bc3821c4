//! Intent binarization.
//!
//! Generators emit continuous scores in `[0, 1]`; the trainer wants exactly
//! `0.0` or `1.0`.

use crate::types::{Catalog, Intents};
use serde::Serialize;

/// Default binarization threshold.
pub const DEFAULT_INTENT_THRESHOLD: f64 = 0.5;

/// Threshold one score: `>= threshold` becomes `1.0`, everything else
/// (including NaN) becomes `0.0`.
///
/// ```
/// use spanguard::intent::binarize;
///
/// assert_eq!(binarize(0.7, 0.5), 1.0);
/// assert_eq!(binarize(0.5, 0.5), 1.0);
/// assert_eq!(binarize(0.3, 0.5), 0.0);
/// assert_eq!(binarize(f64::NAN, 0.5), 0.0);
/// ```
#[must_use]
pub fn binarize(value: f64, threshold: f64) -> f64 {
    if value >= threshold {
        1.0
    } else {
        0.0
    }
}

/// Counters from binarizing one intent map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntentStats {
    /// Values seen.
    pub total: usize,
    /// Values whose number changed.
    pub changed: usize,
    /// Labels removed as unknown.
    pub dropped: usize,
}

impl IntentStats {
    /// Accumulate another set of counters.
    pub fn merge(&mut self, other: &IntentStats) {
        self.total += other.total;
        self.changed += other.changed;
        self.dropped += other.dropped;
    }
}

/// How to binarize a record's intents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentPolicy {
    /// Values at or above this become `1.0`.
    pub threshold: f64,
    /// Remove labels the catalog does not know.
    pub drop_unknown: bool,
}

impl Default for IntentPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_INTENT_THRESHOLD,
            drop_unknown: false,
        }
    }
}

/// Binarize every value in place; in strict mode drop unknown labels.
pub fn binarize_intents(intents: &mut Intents, catalog: &Catalog, policy: IntentPolicy) -> IntentStats {
    let mut stats = IntentStats {
        total: intents.len(),
        ..IntentStats::default()
    };

    if policy.drop_unknown {
        let before = intents.len();
        intents.retain(|label, _| {
            let known = catalog.is_intent_label(label);
            if !known {
                log::debug!("dropping unknown intent {}", label);
            }
            known
        });
        stats.dropped = before - intents.len();
    }

    for value in intents.values_mut() {
        let binary = binarize(*value, policy.threshold);
        // NaN != NaN, so a NaN input always counts as changed.
        if *value != binary {
            stats.changed += 1;
            *value = binary;
        }
    }
    stats
}

/// Are all values exactly `0.0` or `1.0`?
#[must_use]
pub fn is_binary(intents: &Intents) -> bool {
    intents.values().all(|v| *v == 0.0 || *v == 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intents(pairs: &[(&str, f64)]) -> Intents {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn thresholds_scores() {
        let mut map = intents(&[("INVESTIGATE", 0.7), ("DETECT", 0.3)]);
        let stats = binarize_intents(&mut map, &Catalog::builtin(), IntentPolicy::default());
        assert_eq!(map, intents(&[("INVESTIGATE", 1.0), ("DETECT", 0.0)]));
        assert_eq!(stats, IntentStats { total: 2, changed: 2, dropped: 0 });
    }

    #[test]
    fn binary_input_untouched() {
        let mut map = intents(&[("HUNT", 1.0), ("ALERT", 0.0)]);
        let stats = binarize_intents(&mut map, &Catalog::builtin(), IntentPolicy::default());
        assert_eq!(stats.changed, 0);
        assert!(is_binary(&map));
    }

    #[test]
    fn strict_drops_unknown() {
        let mut map = intents(&[("HUNT", 0.9), ("MAKE_COFFEE", 1.0)]);
        let policy = IntentPolicy { drop_unknown: true, ..IntentPolicy::default() };
        let stats = binarize_intents(&mut map, &Catalog::builtin(), policy);
        assert_eq!(map, intents(&[("HUNT", 1.0)]));
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn lenient_keeps_unknown() {
        let mut map = intents(&[("MAKE_COFFEE", 0.2)]);
        binarize_intents(&mut map, &Catalog::builtin(), IntentPolicy::default());
        assert_eq!(map, intents(&[("MAKE_COFFEE", 0.0)]));
    }

    #[test]
    fn nan_becomes_zero() {
        let mut map = intents(&[("HUNT", f64::NAN)]);
        let stats = binarize_intents(&mut map, &Catalog::builtin(), IntentPolicy::default());
        assert_eq!(map["HUNT"], 0.0);
        assert_eq!(stats.changed, 1);
    }
}
