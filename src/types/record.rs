//! Annotated records as they appear on disk.
//!
//! One JSONL line is one [`Record`]:
//!
//! ```text
//! {"text": "Beacon to 10.0.0.5", "entities": [[10, 18, "IP_ADDRESS"]]}
//! {"text": "Look into the phishing kit", "cats": {"INVESTIGATE": 1.0, "DETECT": 0.0}}
//! ```
//!
//! Offsets are half-open **character** offsets into `text`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Multi-label intent scores, keyed by intent label.
pub type Intents = BTreeMap<String, f64>;

/// A labeled `[start, end)` character range.
///
/// Serialized as the array `[start, end, label]`. Offsets are signed so that a
/// negative offset in raw data surfaces as a boundary defect on that span
/// rather than a parse failure for the whole line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64, String)", into = "(i64, i64, String)")]
pub struct Span {
    /// Character offset (start, inclusive)
    pub start: i64,
    /// Character offset (end, exclusive)
    pub end: i64,
    /// Entity label
    pub label: String,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub fn new(start: i64, end: i64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Span length in characters (0 for inverted spans).
    #[must_use]
    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    /// True when `start >= end`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open interval intersection.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The covered surface text, if the offsets are in range.
    #[must_use]
    pub fn surface<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start < 0 || self.start > self.end {
            return None;
        }
        let (start, end) = (self.start as usize, self.end as usize);
        let (bs, be) = crate::offset::chars_to_bytes(text, start, end);
        if end > text.chars().count() {
            return None;
        }
        text.get(bs..be)
    }
}

impl From<(i64, i64, String)> for Span {
    fn from((start, end, label): (i64, i64, String)) -> Self {
        Self { start, end, label }
    }
}

impl From<Span> for (i64, i64, String) {
    fn from(span: Span) -> Self {
        (span.start, span.end, span.label)
    }
}

/// One line of an annotation file.
///
/// A record may carry entities, intents, or both. Intents are read from
/// `"cats"` or from the legacy `"intents"` key; whichever key was present is
/// written back. Unrecognized top-level fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The annotated text.
    pub text: String,

    /// Entity spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Span>>,

    /// Intent scores (current key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cats: Option<Intents>,

    /// Intent scores (legacy key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<Intents>,

    /// Any other fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Entity-only record.
    #[must_use]
    pub fn with_entities(text: impl Into<String>, entities: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            entities: Some(entities),
            cats: None,
            intents: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Intent-only record using the `"cats"` key.
    #[must_use]
    pub fn with_cats(text: impl Into<String>, cats: Intents) -> Self {
        Self {
            text: text.into(),
            entities: None,
            cats: Some(cats),
            intents: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Intent map under whichever key the record uses (`cats` wins).
    #[must_use]
    pub fn intent_map(&self) -> Option<&Intents> {
        self.cats.as_ref().or(self.intents.as_ref())
    }

    /// Mutable intent map under whichever key the record uses.
    pub fn intent_map_mut(&mut self) -> Option<&mut Intents> {
        match (&mut self.cats, &mut self.intents) {
            (Some(cats), _) => Some(cats),
            (None, Some(intents)) => Some(intents),
            (None, None) => None,
        }
    }

    /// Serialize to a single JSONL line (no trailing newline, UTF-8 unescaped).
    pub fn to_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What a file holds, inferred from its name or, failing that, its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// `<category>_entities.jsonl`
    Entities,
    /// `<category>_intent.jsonl`
    Intents,
    /// Anything else; each record is handled by content.
    Mixed,
}

impl RecordKind {
    /// Infer the kind from the file-naming convention.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if name.ends_with("_entities.jsonl") {
            Self::Entities
        } else if name.ends_with("_intent.jsonl") || name.ends_with("_intents.jsonl") {
            Self::Intents
        } else {
            Self::Mixed
        }
    }

    /// Infer the kind from record content: `Entities` or `Intents` when every
    /// record carries only that annotation, `Mixed` otherwise.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let (mut entities, mut intents, mut seen) = (false, false, false);
        for record in records {
            seen = true;
            entities |= record.entities.is_some();
            intents |= record.intent_map().is_some();
        }
        match (seen, entities, intents) {
            (true, true, false) => Self::Entities,
            (true, false, true) => Self::Intents,
            _ => Self::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_falls_back_to_content() {
        assert_eq!(RecordKind::from_path(Path::new("apt_entities.jsonl")), RecordKind::Entities);
        assert_eq!(RecordKind::from_path(Path::new("train.jsonl")), RecordKind::Mixed);

        let spans = [Record::with_entities("a", vec![]), Record::with_entities("b", vec![])];
        assert_eq!(RecordKind::from_records(&spans), RecordKind::Entities);

        let cats = [Record::with_cats("a", Intents::new())];
        assert_eq!(RecordKind::from_records(&cats), RecordKind::Intents);

        let both = [spans[0].clone(), cats[0].clone()];
        assert_eq!(RecordKind::from_records(&both), RecordKind::Mixed);
        assert_eq!(RecordKind::from_records(std::iter::empty()), RecordKind::Mixed);
    }

    #[test]
    fn span_roundtrips_as_array() {
        let line = r#"{"text":"x","entities":[[0,1,"TOOL"]]}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.entities, Some(vec![Span::new(0, 1, "TOOL")]));
        assert_eq!(record.to_line().unwrap(), line);
    }

    #[test]
    fn negative_offsets_parse() {
        let record: Record =
            serde_json::from_str(r#"{"text":"abc","entities":[[-1,2,"TOOL"]]}"#).unwrap();
        assert_eq!(record.entities.unwrap()[0].start, -1);
    }

    #[test]
    fn legacy_intents_key_is_preserved() {
        let line = r#"{"text":"t","intents":{"DETECT":1.0}}"#;
        let mut record: Record = serde_json::from_str(line).unwrap();
        assert!(record.cats.is_none());
        record.intent_map_mut().unwrap().insert("DETECT".into(), 0.0);
        assert_eq!(record.to_line().unwrap(), r#"{"text":"t","intents":{"DETECT":0.0}}"#);
    }

    #[test]
    fn extra_fields_pass_through() {
        let line = r#"{"text":"t","entities":[],"meta":{"source":"gen"}}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert!(record.extra.contains_key("meta"));
        assert_eq!(record.to_line().unwrap(), line);
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let record = Record::with_entities("café → 10.0.0.5", vec![]);
        assert!(record.to_line().unwrap().contains("café →"));
    }

    #[test]
    fn surface_uses_char_offsets() {
        let text = "C2 → 10.0.0.5";
        assert_eq!(Span::new(5, 13, "IP_ADDRESS").surface(text), Some("10.0.0.5"));
        assert_eq!(Span::new(5, 99, "IP_ADDRESS").surface(text), None);
        assert_eq!(Span::new(-1, 3, "IP_ADDRESS").surface(text), None);
    }

    #[test]
    fn kind_from_path() {
        assert_eq!(
            RecordKind::from_path(Path::new("data/apt/apt_entities.jsonl")),
            RecordKind::Entities
        );
        assert_eq!(
            RecordKind::from_path(Path::new("apt_intent.jsonl")),
            RecordKind::Intents
        );
        assert_eq!(RecordKind::from_path(Path::new("misc.jsonl")), RecordKind::Mixed);
    }
}
