//! Entity and intent label catalogs.

use std::collections::BTreeSet;

/// Labels whose surface form is fixed by syntax. Each has an entry in the
/// built-in [`PatternRegistry`](crate::patterns::PatternRegistry).
pub const CLOSED_FORM_LABELS: &[&str] = &[
    "IP_ADDRESS",
    "IPV6_ADDRESS",
    "DOMAIN",
    "CVE_ID",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "SSN",
    "CREDIT_CARD",
    "CRYPTO_WALLET",
    "URL",
    "FILE_HASH",
    "MD5_HASH",
    "SHA1_HASH",
    "SHA256_HASH",
    "GITHUB_REPO",
    "GITHUB_URL",
    "GITHUB_ISSUE",
    "GITHUB_COMMIT",
    "GITHUB_GIST",
    "LATITUDE",
    "LONGITUDE",
    "GEOJSON_POINT",
    "DMS_COORDINATE",
    "EMOJI",
];

/// Free-text labels, checked by boundary and denylist rules only.
pub const OPEN_VOCABULARY_LABELS: &[&str] = &[
    "THREAT_ACTOR",
    "MALWARE",
    "MALWARE_TYPE",
    "MALWARE_FAMILY",
    "ATTACK_TYPE",
    "ATTACK_TECHNIQUE",
    "VULNERABILITY",
    "SECURITY_TYPE",
    "TOOL",
    "SOFTWARE",
    "PLATFORM",
    "ROLE",
    "PERSON",
    "ORGANIZATION",
    "LOCATION",
    "COUNTRY",
    "INDUSTRY",
    "CAMPAIGN",
    "USERNAME",
    "SOCIAL_MEDIA_HANDLE",
    "FILE_NAME",
    "FILE_PATH",
    "PROTOCOL",
    "PORT",
    "DATE",
    "TIME",
];

/// Intent labels of the multi-label classifier.
pub const INTENT_LABELS: &[&str] = &[
    "INVESTIGATE",
    "DETECT",
    "MONITOR",
    "ANALYZE",
    "RESPOND",
    "MITIGATE",
    "ATTRIBUTE",
    "ENRICH",
    "HUNT",
    "REPORT",
    "ALERT",
    "TRACK",
];

/// The set of valid entity and intent labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entity_labels: BTreeSet<String>,
    intent_labels: BTreeSet<String>,
}

impl Catalog {
    /// Built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entity_labels: CLOSED_FORM_LABELS
                .iter()
                .chain(OPEN_VOCABULARY_LABELS)
                .map(|s| (*s).to_string())
                .collect(),
            intent_labels: INTENT_LABELS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Empty catalog (every label unknown).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entity_labels: BTreeSet::new(),
            intent_labels: BTreeSet::new(),
        }
    }

    /// Add entity labels.
    #[must_use]
    pub fn with_entity_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Add intent labels.
    #[must_use]
    pub fn with_intent_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.intent_labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Is `label` a known entity type?
    #[must_use]
    pub fn is_entity_label(&self, label: &str) -> bool {
        self.entity_labels.contains(label)
    }

    /// Is `label` a known intent?
    #[must_use]
    pub fn is_intent_label(&self, label: &str) -> bool {
        self.intent_labels.contains(label)
    }

    /// Known entity labels, sorted.
    pub fn entity_labels(&self) -> impl Iterator<Item = &str> {
        self.entity_labels.iter().map(String::as_str)
    }

    /// Known intent labels, sorted.
    pub fn intent_labels(&self) -> impl Iterator<Item = &str> {
        self.intent_labels.iter().map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_both_vocabularies() {
        let catalog = Catalog::builtin();
        assert!(catalog.is_entity_label("IP_ADDRESS"));
        assert!(catalog.is_entity_label("THREAT_ACTOR"));
        assert!(!catalog.is_entity_label("ip_address"));
        assert!(catalog.is_intent_label("INVESTIGATE"));
        assert!(!catalog.is_intent_label("IP_ADDRESS"));
    }

    #[test]
    fn extension_adds_labels() {
        let catalog = Catalog::empty()
            .with_entity_labels(["MAC_ADDRESS"])
            .with_intent_labels(vec![String::from("TRIAGE")]);
        assert!(catalog.is_entity_label("MAC_ADDRESS"));
        assert!(catalog.is_intent_label("TRIAGE"));
        assert_eq!(catalog.entity_labels().count(), 1);
    }

    #[test]
    fn vocabularies_are_disjoint() {
        for label in CLOSED_FORM_LABELS {
            assert!(!OPEN_VOCABULARY_LABELS.contains(label), "{label}");
        }
    }
}
