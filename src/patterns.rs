//! Pattern registry: canonical lexical forms of closed-form labels.
//!
//! A label is *closed-form* when every valid surface form is described by a
//! regular expression (IP addresses, CVE ids, hashes, ...). Open-vocabulary
//! labels (`THREAT_ACTOR`, `TOOL`, ...) have no entry and are checked only by
//! boundary and denylist rules.
//!
//! Every entry carries two compiled forms of the same source:
//!
//! - `search`: unanchored, used by the repairer to find candidate matches
//!   near a broken span;
//! - `full`: `^(?:...)$`, used by the validator. Anchoring matters: an
//!   unanchored leftmost-first search can stop at a shorter alternative and
//!   report a false mismatch.
//!
//! Digit classes are spelled `[0-9]` because `\d` is Unicode-aware in the
//! `regex` crate.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Extra constraint applied after a full regex match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCheck {
    /// At least this many ASCII digits once separators are stripped.
    MinDigits(usize),
}

impl PatternCheck {
    fn accepts(self, surface: &str) -> bool {
        match self {
            PatternCheck::MinDigits(n) => surface.chars().filter(char::is_ascii_digit).count() >= n,
        }
    }
}

/// A built-in pattern definition.
pub struct PatternDef {
    /// Label governed by this pattern.
    pub label: &'static str,
    /// Regex source (unanchored).
    pub source: &'static str,
    /// Optional post-match constraint.
    pub check: Option<PatternCheck>,
    /// Human-readable description.
    pub description: &'static str,
}

// =============================================================================
// Regex Sources
// =============================================================================

macro_rules! ipv4 {
    () => {
        r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)"
    };
}

macro_rules! ipv6 {
    () => {
        concat!(
            r"(?:",
            r"(?:[0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,6}:[0-9A-Fa-f]{1,4}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,5}(?::[0-9A-Fa-f]{1,4}){1,2}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,4}(?::[0-9A-Fa-f]{1,4}){1,3}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,3}(?::[0-9A-Fa-f]{1,4}){1,4}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,2}(?::[0-9A-Fa-f]{1,4}){1,5}",
            r"|[0-9A-Fa-f]{1,4}:(?::[0-9A-Fa-f]{1,4}){1,6}",
            r"|:(?::[0-9A-Fa-f]{1,4}){1,7}",
            r"|(?:[0-9A-Fa-f]{1,4}:){1,7}:",
            r"|::",
            r")(?:%[0-9A-Za-z]+)?"
        )
    };
}

const IPV6: &str = ipv6!();

const IP_ANY: &str = concat!("(?:", ipv4!(), "|", ipv6!(), ")");

const DOMAIN: &str = r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}";

const EMAIL: &str =
    r"[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}";

const PHONE: &str =
    r"\+?(?:\([0-9]{1,4}\)|[0-9]{1,4})(?:[ .-]?(?:\([0-9]{1,4}\)|[0-9]{1,4})){1,7}";

const URL: &str = r#"[A-Za-z][A-Za-z0-9+.-]*://[^\s<>"'{}|\\^`]*[^\s<>"'{}|\\^`.,;:!?)\]]"#;

const GITHUB_REPO: &str = r"[A-Za-z0-9][A-Za-z0-9-]{0,38}/[A-Za-z0-9._-]*[A-Za-z0-9_-]";

const GITHUB_URL: &str =
    r"https?://(?:www\.)?github\.com/[A-Za-z0-9-]{1,39}(?:/[A-Za-z0-9._-]*[A-Za-z0-9_-])*";

const GITHUB_ISSUE: &str = concat!(
    r"https?://(?:www\.)?github\.com/[A-Za-z0-9-]{1,39}/[A-Za-z0-9._-]+/(?:issues|pull)/[0-9]+",
    r"|(?:[A-Za-z0-9-]{1,39}/[A-Za-z0-9._-]+)?#[0-9]+"
);

const GITHUB_COMMIT: &str = concat!(
    r"https?://(?:www\.)?github\.com/[A-Za-z0-9-]{1,39}/[A-Za-z0-9._-]+/commit/[0-9a-f]{7,40}",
    r"|[0-9a-f]{7,40}"
);

const GITHUB_GIST: &str = r"https?://gist\.github\.com/(?:[A-Za-z0-9-]{1,39}/)?[0-9a-f]{20,32}";

const LATITUDE: &str = r"[-+]?(?:90(?:\.0+)?|[1-8]?[0-9](?:\.[0-9]+)?)";

const LONGITUDE: &str = r"[-+]?(?:180(?:\.0+)?|(?:1[0-7][0-9]|[1-9]?[0-9])(?:\.[0-9]+)?)";

const GEOJSON_POINT: &str = concat!(
    r#"\{\s*"type"\s*:\s*"Point"\s*,\s*"coordinates"\s*:\s*\[\s*"#,
    r#"[-+]?[0-9]+(?:\.[0-9]+)?\s*,\s*[-+]?[0-9]+(?:\.[0-9]+)?\s*\]\s*\}"#
);

const DMS_COORDINATE: &str = concat!(
    r#"[0-9]{1,3}°\s?[0-9]{1,2}['′]\s?[0-9]{1,2}(?:\.[0-9]+)?(?:"|″|'')\s?[NSEWnsew]"#
);

const EMOJI: &str = concat!(
    r"(?:[\x{1F000}-\x{1FAFF}\x{2600}-\x{27BF}\x{2300}-\x{23FF}\x{2B00}-\x{2BFF}]",
    r"[\x{FE0F}\x{200D}\x{1F3FB}-\x{1F3FF}]*)+"
);

/// All built-in pattern definitions.
pub static BUILTIN_PATTERNS: &[PatternDef] = &[
    PatternDef { label: "IP_ADDRESS", source: IP_ANY, check: None, description: "IPv4 dotted quad or IPv6" },
    PatternDef { label: "IPV6_ADDRESS", source: IPV6, check: None, description: "IPv6, full or ::-compressed, optional %zone" },
    PatternDef { label: "DOMAIN", source: DOMAIN, check: None, description: "DNS labels ending in an alphabetic TLD" },
    PatternDef { label: "CVE_ID", source: r"(?i)CVE-[0-9]{4}-[0-9]{4,}", check: None, description: "CVE-YYYY-NNNN[N...]" },
    PatternDef { label: "EMAIL_ADDRESS", source: EMAIL, check: None, description: "local@domain" },
    PatternDef { label: "PHONE_NUMBER", source: PHONE, check: Some(PatternCheck::MinDigits(7)), description: "Digit groups, 7+ digits" },
    PatternDef { label: "SSN", source: r"[0-9]{3}-[0-9]{2}-[0-9]{4}", check: None, description: "NNN-NN-NNNN" },
    PatternDef { label: "CREDIT_CARD", source: r"[0-9]{4}(?:[ -]?[0-9]{4}){3}", check: None, description: "16 digits, optionally grouped" },
    PatternDef { label: "CRYPTO_WALLET", source: r"0x[0-9A-Fa-f]{40}", check: None, description: "0x + 40 hex (Ethereum style)" },
    PatternDef { label: "URL", source: URL, check: None, description: "scheme://..." },
    PatternDef { label: "FILE_HASH", source: r"[0-9A-Fa-f]{128}|[0-9A-Fa-f]{64}|[0-9A-Fa-f]{40}|[0-9A-Fa-f]{32}", check: None, description: "MD5, SHA-1, SHA-256 or SHA-512 hex digest" },
    PatternDef { label: "MD5_HASH", source: r"[0-9A-Fa-f]{32}", check: None, description: "32 hex" },
    PatternDef { label: "SHA1_HASH", source: r"[0-9A-Fa-f]{40}", check: None, description: "40 hex" },
    PatternDef { label: "SHA256_HASH", source: r"[0-9A-Fa-f]{64}", check: None, description: "64 hex" },
    PatternDef { label: "GITHUB_REPO", source: GITHUB_REPO, check: None, description: "owner/repo" },
    PatternDef { label: "GITHUB_URL", source: GITHUB_URL, check: None, description: "https://github.com/owner[/...]" },
    PatternDef { label: "GITHUB_ISSUE", source: GITHUB_ISSUE, check: None, description: "#N, owner/repo#N or issue/PR URL" },
    PatternDef { label: "GITHUB_COMMIT", source: GITHUB_COMMIT, check: None, description: "7-40 hex SHA or commit URL" },
    PatternDef { label: "GITHUB_GIST", source: GITHUB_GIST, check: None, description: "https://gist.github.com/[user/]id" },
    PatternDef { label: "LATITUDE", source: LATITUDE, check: None, description: "Signed decimal in [-90, 90]" },
    PatternDef { label: "LONGITUDE", source: LONGITUDE, check: None, description: "Signed decimal in [-180, 180]" },
    PatternDef { label: "GEOJSON_POINT", source: GEOJSON_POINT, check: None, description: "{\"type\": \"Point\", \"coordinates\": [x, y]}" },
    PatternDef { label: "DMS_COORDINATE", source: DMS_COORDINATE, check: None, description: "D°M'S\" + hemisphere" },
    PatternDef { label: "EMOJI", source: EMOJI, check: None, description: "Emoji code points and sequences" },
];

static BUILTIN_REGISTRY: Lazy<PatternRegistry> = Lazy::new(|| {
    let mut registry = PatternRegistry::empty();
    for def in BUILTIN_PATTERNS {
        // Built-in sources are constants: failure is a programmer error.
        let entry = PatternEntry::compile(def.label, def.source, def.check, def.description)
            .unwrap_or_else(|e| panic!("built-in pattern {} is invalid: {}", def.label, e));
        registry.entries.insert(def.label.to_string(), entry);
    }
    registry
});

// =============================================================================
// Registry
// =============================================================================

/// One compiled registry entry.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    label: String,
    source: String,
    search: Regex,
    full: Regex,
    check: Option<PatternCheck>,
    description: String,
}

impl PatternEntry {
    /// Compile an entry from an unanchored source.
    pub fn compile(
        label: &str,
        source: &str,
        check: Option<PatternCheck>,
        description: &str,
    ) -> Result<Self> {
        let search = Regex::new(source)
            .map_err(|e| Error::pattern(format!("{}: {}", label, e)))?;
        let full = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| Error::pattern(format!("{}: {}", label, e)))?;
        Ok(Self {
            label: label.to_string(),
            source: source.to_string(),
            search,
            full,
            check,
            description: description.to_string(),
        })
    }

    /// Governed label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Regex source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Does `surface` match this pattern in its entirety?
    #[must_use]
    pub fn full_match(&self, surface: &str) -> bool {
        self.full.is_match(surface) && self.check.map_or(true, |c| c.accepts(surface))
    }

    /// Non-overlapping unanchored matches in `haystack` (byte offsets).
    pub fn find_iter<'h>(&self, haystack: &'h str) -> regex::Matches<'_, 'h> {
        self.search.find_iter(haystack)
    }
}

/// Label -> compiled pattern lookup.
///
/// Instances are plain values: build one per configuration and pass it to
/// the validator and repairer. Cloning is cheap (compiled regexes are
/// reference-counted).
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    entries: BTreeMap<String, PatternEntry>,
}

impl PatternRegistry {
    /// Registry with no entries (every label is open-vocabulary).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry with all built-in patterns.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_REGISTRY.clone()
    }

    /// Add or replace the pattern for `label`.
    pub fn insert(&mut self, label: &str, source: &str) -> Result<()> {
        let entry = PatternEntry::compile(label, source, None, "custom")?;
        log::debug!("registered pattern for {}", label);
        self.entries.insert(label.to_string(), entry);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_pattern(mut self, label: &str, source: &str) -> Result<Self> {
        self.insert(label, source)?;
        Ok(self)
    }

    /// Pattern for `label`, or `None` for open-vocabulary labels.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&PatternEntry> {
        self.entries.get(label)
    }

    /// Is `label` closed-form?
    #[must_use]
    pub fn is_closed_form(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// All entries, sorted by label.
    pub fn entries(&self) -> impl Iterator<Item = &PatternEntry> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels whose pattern fully matches `surface`.
    #[must_use]
    pub fn classify(&self, surface: &str) -> Vec<&str> {
        self.entries
            .values()
            .filter(|e| e.full_match(surface))
            .map(PatternEntry::label)
            .collect()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
