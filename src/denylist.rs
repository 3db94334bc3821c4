//! Common-word denylist.
//!
//! Template generators interpolate entities into sentences, and naive
//! "find the entity in the sentence" span discovery tends to latch onto a
//! connector word instead. Two guards catch that:
//!
//! - **common words**: stopwords, generic verbs and generic nouns that are
//!   never an entity whatever the label;
//! - **problematic pairs**: tokens that are wrong only for a specific label
//!   (`PHONE_NUMBER` on the literal word "phone", `SECURITY_TYPE` on
//!   "security").
//!
//! Matching is case-insensitive and exact after trimming whitespace.

use std::collections::{BTreeMap, BTreeSet};

/// Stopwords, generic verbs and generic nouns.
pub const COMMON_WORDS: &[&str] = &[
    // articles, pronouns, determiners
    "a", "an", "the", "this", "that", "these", "those", "it", "its", "they",
    "them", "their", "we", "our", "you", "your", "he", "she", "his", "her",
    "i", "me", "my", "who", "whom", "which", "what", "some", "any", "all",
    "each", "every", "other", "another", "such",
    // prepositions, conjunctions
    "and", "or", "but", "nor", "so", "yet", "of", "in", "on", "at", "to",
    "for", "from", "by", "with", "about", "into", "onto", "over", "under",
    "via", "per", "as", "than", "then", "if", "when", "while", "where",
    "after", "before", "between", "against", "during", "through", "near",
    // auxiliaries
    "is", "are", "was", "were", "be", "been", "being", "am", "has", "have",
    "had", "do", "does", "did", "will", "would", "can", "could", "should",
    "may", "might", "must", "shall", "not", "no", "yes",
    // generic verbs
    "check", "find", "show", "get", "set", "run", "use", "used", "using",
    "look", "see", "scan", "block", "allow", "send", "sent", "connect",
    "connected", "connecting", "detect", "detected", "investigate", "analyze",
    "monitor", "track", "report", "review", "search", "identify", "observed",
    "found", "seen", "contact", "reach", "trace", "lookup", "query",
    // generic nouns
    "system", "systems", "server", "servers", "network", "networks", "data",
    "file", "files", "user", "users", "host", "hosts", "device", "devices",
    "thing", "things", "info", "information", "details", "activity", "traffic",
    "access", "account", "accounts", "service", "services", "issue", "issues",
    "event", "events", "log", "logs", "alert", "alerts", "address",
    "number", "value", "item", "items", "source", "target", "here", "there",
    "now", "today", "please",
];

/// Label-specific tokens that are never valid for that label.
pub const PROBLEMATIC_PAIRS: &[(&str, &[&str])] = &[
    ("PHONE_NUMBER", &["phone", "number", "call", "contact", "mobile", "tel", "telephone", "cell"]),
    ("EMAIL_ADDRESS", &["email", "mail", "e-mail", "address", "inbox", "mailbox"]),
    ("IP_ADDRESS", &["ip", "address", "ipv4", "ipv6", "host"]),
    ("IPV6_ADDRESS", &["ip", "ipv6", "address"]),
    ("DOMAIN", &["domain", "website", "site", "web", "dns", "hostname"]),
    ("URL", &["url", "link", "website", "http", "https"]),
    ("CVE_ID", &["cve", "vulnerability", "vuln", "exploit"]),
    ("FILE_HASH", &["hash", "md5", "sha1", "sha256", "checksum"]),
    ("CRYPTO_WALLET", &["wallet", "crypto", "bitcoin", "ethereum", "address"]),
    ("SECURITY_TYPE", &["security", "incident", "response", "threat", "attack", "type"]),
    ("THREAT_ACTOR", &["actor", "actors", "group", "hacker", "hackers", "attacker", "attackers", "threat", "adversary"]),
    ("MALWARE", &["malware", "virus", "sample", "payload"]),
    ("MALWARE_TYPE", &["malware", "type", "sample"]),
    ("TOOL", &["tool", "tools", "software", "utility"]),
    ("ROLE", &["role", "person", "someone", "team"]),
    ("ORGANIZATION", &["organization", "company", "org", "team"]),
    ("PERSON", &["person", "someone", "user", "people"]),
    ("LOCATION", &["location", "place", "area", "region"]),
    ("GITHUB_REPO", &["repo", "repository", "github"]),
    ("USERNAME", &["username", "user", "handle", "account"]),
];

/// Common-word and label-specific denylists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    words: BTreeSet<String>,
    problematic: BTreeMap<String, BTreeSet<String>>,
}

impl Denylist {
    /// Built-in denylist.
    #[must_use]
    pub fn builtin() -> Self {
        let words = COMMON_WORDS.iter().map(|w| (*w).to_string()).collect();
        let problematic = PROBLEMATIC_PAIRS
            .iter()
            .map(|(label, tokens)| {
                (
                    (*label).to_string(),
                    tokens.iter().map(|t| (*t).to_string()).collect(),
                )
            })
            .collect();
        Self { words, problematic }
    }

    /// Empty denylist (nothing is rejected).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            words: BTreeSet::new(),
            problematic: BTreeMap::new(),
        }
    }

    /// Add common words.
    #[must_use]
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| normalize(w.as_ref())));
        self
    }

    /// Add tokens that are invalid for `label`.
    #[must_use]
    pub fn with_problematic<I, S>(mut self, label: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.problematic
            .entry(label.to_string())
            .or_default()
            .extend(tokens.into_iter().map(|t| normalize(t.as_ref())));
        self
    }

    /// Is `token` a common word?
    ///
    /// ```
    /// use spanguard::Denylist;
    ///
    /// let denylist = Denylist::builtin();
    /// assert!(denylist.is_denylisted(" The "));
    /// assert!(!denylist.is_denylisted("APT29"));
    /// ```
    #[must_use]
    pub fn is_denylisted(&self, token: &str) -> bool {
        self.words.contains(&normalize(token))
    }

    /// Is `token` never valid for `label`?
    #[must_use]
    pub fn is_problematic(&self, label: &str, token: &str) -> bool {
        self.problematic
            .get(label)
            .is_some_and(|tokens| tokens.contains(&normalize(token)))
    }

    /// Number of common words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of `(label, token)` pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.problematic.values().map(BTreeSet::len).sum()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_words_case_insensitive() {
        let d = Denylist::builtin();
        assert!(d.is_denylisted("the"));
        assert!(d.is_denylisted("THE"));
        assert!(d.is_denylisted("  Server\t"));
        assert!(!d.is_denylisted("Cobalt Strike"));
    }

    #[test]
    fn problematic_is_label_scoped() {
        let d = Denylist::builtin();
        assert!(d.is_problematic("SECURITY_TYPE", "Security"));
        assert!(d.is_problematic("PHONE_NUMBER", "phone"));
        assert!(!d.is_problematic("TOOL", "phone"));
        assert!(!d.is_problematic("UNKNOWN", "security"));
    }

    #[test]
    fn security_is_not_a_common_word() {
        // "security" is only wrong as a SECURITY_TYPE span.
        assert!(!Denylist::builtin().is_denylisted("security"));
    }

    #[test]
    fn extension() {
        let d = Denylist::empty()
            .with_words(["Widget"])
            .with_problematic("TOOL", ["Thing"]);
        assert!(d.is_denylisted("widget"));
        assert!(d.is_problematic("TOOL", "THING"));
        assert_eq!(d.word_count(), 1);
        assert_eq!(d.pair_count(), 1);
    }

    #[test]
    fn builtin_lists_are_normalized() {
        for word in COMMON_WORDS {
            assert_eq!(*word, word.trim().to_lowercase());
        }
    }
}
