//! End-to-end record scenarios through the default auditor.
//!
//! Offsets are character offsets into the record text.

use spanguard::{AuditConfig, Auditor, Intents, IssueCode, Profile, Record, RecordKind, Span};
use std::path::Path;

fn auditor() -> Auditor {
    Auditor::new(AuditConfig::default()).unwrap()
}

// =============================================================================
// Span Repair and Removal
// =============================================================================

#[test]
fn ip_with_cidr_suffix_is_reanchored() {
    let record = Record::with_entities(
        "Reconnect 192.168.1.1/24 now",
        vec![Span::new(10, 24, "IP_ADDRESS")],
    );
    let (fixed, stats) = auditor().process(&record);

    let entities = fixed.entities.unwrap();
    assert_eq!(entities, vec![Span::new(10, 21, "IP_ADDRESS")]);
    assert_eq!(entities[0].surface(&fixed.text), Some("192.168.1.1"));
    assert_eq!(stats.repaired, 1);
    assert_eq!(stats.issues.get(&IssueCode::InvalidPattern), Some(&1));
}

#[test]
fn denylisted_token_for_problematic_label_is_removed() {
    let record = Record::with_entities(
        "Security incident response",
        vec![Span::new(0, 8, "SECURITY_TYPE")],
    );
    let (fixed, stats) = auditor().process(&record);

    assert_eq!(fixed.entities, Some(vec![]));
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.entities_after, 0);
    assert_eq!(stats.issues.get(&IssueCode::ProblematicLabel), Some(&1));
}

#[test]
fn overlapping_valid_spans_keep_the_earliest_longest() {
    let text = "see https://evil.example.com/x now";
    let record = Record::with_entities(
        text,
        vec![Span::new(12, 28, "DOMAIN"), Span::new(4, 30, "URL")],
    );
    let (fixed, stats) = auditor().process(&record);

    assert_eq!(fixed.entities.unwrap(), vec![Span::new(4, 30, "URL")]);
    assert_eq!(stats.issues.get(&IssueCode::Overlap), Some(&1));
    assert_eq!(stats.removed, 1);
}

#[test]
fn zero_length_span_is_a_boundary_failure() {
    let record = Record::with_entities(
        "Mail bob@example.com today",
        vec![Span::new(3, 3, "EMAIL_ADDRESS")],
    );
    let (fixed, stats) = auditor().process(&record);

    assert_eq!(fixed.entities, Some(vec![]));
    assert_eq!(stats.issues.get(&IssueCode::InvalidBoundary), Some(&1));
    assert_eq!(stats.repaired, 0);
}

#[test]
fn truncated_cve_is_extended() {
    let record = Record::with_entities(
        "Patch CVE-2021-44228 today",
        vec![Span::new(6, 19, "CVE_ID")],
    );
    let (fixed, _) = auditor().process(&record);
    assert_eq!(fixed.entities.unwrap(), vec![Span::new(6, 20, "CVE_ID")]);
}

#[test]
fn padded_open_vocabulary_span_is_trimmed() {
    let record = Record::with_entities(
        "Dropped mimikatz on the host",
        vec![Span::new(7, 17, "MALWARE")],
    );
    let (fixed, stats) = auditor().process(&record);
    assert_eq!(fixed.entities.unwrap(), vec![Span::new(8, 16, "MALWARE")]);
    assert_eq!(stats.trimmed, 1);
}

#[test]
fn non_ascii_prefix_does_not_shift_offsets() {
    // "Café → " is 7 characters but 10 bytes.
    let record = Record::with_entities(
        "Café → 192.168.1.1/24",
        vec![Span::new(7, 21, "IP_ADDRESS")],
    );
    let (fixed, _) = auditor().process(&record);
    let entities = fixed.entities.unwrap();
    assert_eq!(entities, vec![Span::new(7, 18, "IP_ADDRESS")]);
    assert_eq!(entities[0].surface(&fixed.text), Some("192.168.1.1"));
}

#[test]
fn spans_glued_to_a_word_are_removed() {
    for (text, span) in [
        ("see ver2#42 now", Span::new(8, 11, "GITHUB_ISSUE")),
        ("on fire🔥 now", Span::new(7, 8, "EMOJI")),
    ] {
        let record = Record::with_entities(text, vec![span]);
        let (fixed, stats) = auditor().process(&record);
        assert_eq!(fixed.entities, Some(vec![]), "{text}");
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.issues.get(&IssueCode::PartialWord), Some(&1));
    }
}

#[test]
fn strict_profile_drops_unknown_labels() {
    let record = Record::with_entities("Operation Nightfall began", vec![Span::new(10, 19, "CAMPAIGN_X")]);

    let (lenient, stats) = auditor().process(&record);
    assert_eq!(lenient.entities.unwrap().len(), 1);
    assert_eq!(stats.warnings.get(&IssueCode::UnknownLabel), Some(&1));

    let strict = Auditor::new(AuditConfig::from_profile(Profile::Strict)).unwrap();
    let (fixed, stats) = strict.process(&record);
    assert_eq!(fixed.entities, Some(vec![]));
    assert_eq!(stats.issues.get(&IssueCode::UnknownLabel), Some(&1));
}

// =============================================================================
// Intents
// =============================================================================

#[test]
fn intent_scores_are_binarized() {
    let mut cats = Intents::new();
    cats.insert("INVESTIGATE".into(), 0.7);
    cats.insert("DETECT".into(), 0.3);
    let record = Record::with_cats("Look into the beacon traffic", cats);

    let (fixed, stats) = auditor().process(&record);
    let cats = fixed.cats.unwrap();
    assert_eq!(cats.get("INVESTIGATE"), Some(&1.0));
    assert_eq!(cats.get("DETECT"), Some(&0.0));
    assert_eq!(stats.intents.total, 2);
    assert_eq!(stats.intents.changed, 2);
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn truncated_line_is_skipped_and_counted() {
    let content = concat!(
        "{\"text\": \"Patch CVE-2021-44228 today\", \"entities\": [[6, 20, \"CVE_ID\"]]}\n",
        "{\"text\": \"foo\", \"entities\": [[0,3\n",
        "{\"text\": \"Reconnect 192.168.1.1/24 now\", \"entities\": [[10, 24, \"IP_ADDRESS\"]]}\n",
    );
    let (out, report) = auditor()
        .process_content(Path::new("apt_entities.jsonl"), content)
        .unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.parse_errors.len(), 1);
    assert_eq!(report.parse_errors[0].line, 2);
    assert_eq!(report.stats.unchanged, 1);
    assert_eq!(report.stats.repaired, 1);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("[10,21,\"IP_ADDRESS\"]"));
}

#[test]
fn unknown_fields_survive_a_rewrite() {
    let content = "{\"text\": \"Patch CVE-2021-44228\", \"entities\": [[6, 20, \"CVE_ID\"]], \"source\": \"feed-7\"}\n";
    let (out, _) = auditor()
        .process_content(Path::new("x_entities.jsonl"), content)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(value["source"], "feed-7");
}

#[test]
fn file_kind_falls_back_to_record_content() {
    let intents = "{\"text\": \"Look into it\", \"cats\": {\"INVESTIGATE\": 0.7}}\n";
    let (_, report) = auditor().process_content(Path::new("train.jsonl"), intents).unwrap();
    assert_eq!(report.kind, RecordKind::Intents);

    let mixed = concat!(
        "{\"text\": \"Look into it\", \"cats\": {\"INVESTIGATE\": 0.7}}\n",
        "{\"text\": \"Patch CVE-2021-44228\", \"entities\": [[6, 20, \"CVE_ID\"]]}\n",
    );
    let (_, report) = auditor().process_content(Path::new("train.jsonl"), mixed).unwrap();
    assert_eq!(report.kind, RecordKind::Mixed);
}
