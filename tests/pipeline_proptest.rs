//! Property-based tests for the record pipeline.
//!
//! Texts are built from a mix of well-formed indicators, padded/cut
//! variants and ordinary words; spans are arbitrary (including out of
//! range and inverted).

use proptest::prelude::*;
use spanguard::validate::is_word_char;
use spanguard::{Record, Span, SpanConverter, Toolkit};

const TOKENS: &[&str] = &[
    "192.168.1.1/24",
    "10.0.0.7",
    "CVE-2021-44228",
    "evil.example.com",
    "https://evil.example.com/x",
    "bob@example.com",
    "mimikatz",
    "the",
    "Security",
    "café",
    "→",
    "(see",
    "report).",
    "d41d8cd98f00b204e9800998ecf8427e",
];

const LABELS: &[&str] = &[
    "IP_ADDRESS",
    "CVE_ID",
    "DOMAIN",
    "URL",
    "EMAIL_ADDRESS",
    "MALWARE",
    "SECURITY_TYPE",
    "MD5_HASH",
    "NOT_A_LABEL",
];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(TOKENS), 1..8).prop_map(|words| words.join(" "))
}

fn record_strategy() -> impl Strategy<Value = Record> {
    text_strategy().prop_flat_map(|text| {
        let len = text.chars().count() as i64;
        let span = (-2i64..len + 3, 0i64..16, prop::sample::select(LABELS))
            .prop_map(|(start, width, label)| Span::new(start, start + width, label));
        prop::collection::vec(span, 0..6)
            .prop_map(move |spans| Record::with_entities(text.clone(), spans))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// A second pass over fixed output changes nothing.
    #[test]
    fn fixing_is_idempotent(record in record_strategy()) {
        let toolkit = Toolkit::builtin();
        let (once, _) = spanguard::audit::process_record(&toolkit, &record);
        let (twice, stats) = spanguard::audit::process_record(&toolkit, &once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!stats.is_modified());
    }

    /// Every surviving span passes validation.
    #[test]
    fn survivors_are_valid(record in record_strategy()) {
        let toolkit = Toolkit::builtin();
        let (fixed, _) = spanguard::audit::process_record(&toolkit, &record);
        let validator = toolkit.validator();
        for span in fixed.entities.unwrap_or_default() {
            let v = validator.validate(&fixed.text, &span);
            prop_assert!(v.is_valid(), "{:?} over {:?}: {:?}", span, fixed.text, v.issues);
        }
    }

    /// No surviving span touches a word character just outside either edge.
    #[test]
    fn survivors_respect_word_boundaries(record in record_strategy()) {
        let toolkit = Toolkit::builtin();
        let (fixed, _) = spanguard::audit::process_record(&toolkit, &record);
        let chars: Vec<char> = fixed.text.chars().collect();
        for span in fixed.entities.unwrap_or_default() {
            let (start, end) = (span.start as usize, span.end as usize);
            if start > 0 {
                prop_assert!(
                    !is_word_char(chars[start - 1]),
                    "{:?} starts mid-word in {:?}", span, fixed.text
                );
            }
            if end < chars.len() {
                prop_assert!(
                    !is_word_char(chars[end]),
                    "{:?} ends mid-word in {:?}", span, fixed.text
                );
            }
        }
    }

    /// Output spans are pairwise disjoint, in range and sorted by start.
    #[test]
    fn survivors_do_not_overlap(record in record_strategy()) {
        let toolkit = Toolkit::builtin();
        let (fixed, stats) = spanguard::audit::process_record(&toolkit, &record);
        let spans = fixed.entities.unwrap_or_default();
        let conv = SpanConverter::new(&fixed.text);
        for span in &spans {
            prop_assert!(0 <= span.start && span.start < span.end);
            prop_assert!(span.end as usize <= conv.char_len());
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start, "{:?}", pair);
        }
        prop_assert_eq!(stats.entities_after, spans.len());
        prop_assert_eq!(
            stats.entities_before,
            stats.unchanged + stats.trimmed + stats.repaired + stats.removed
        );
    }
}
