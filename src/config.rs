//! Audit configuration.
//!
//! Every tunable of the pipeline lives in [`AuditConfig`]. A config starts
//! from a named [`Profile`] and may be overlaid with a TOML file:
//!
//! ```toml
//! profile = "strict"
//! min_length = 3
//!
//! [repair]
//! window = 60
//!
//! [denylist]
//! words = ["stuff"]
//!
//! [denylist.problematic]
//! TOOL = ["toolkit"]
//!
//! [patterns]
//! MAC_ADDRESS = '(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}'
//! ```
//!
//! Keys missing from the file keep the profile's value. The runtime objects
//! (pattern registry, denylist, catalog) are built from the config once, by
//! [`AuditConfig::toolkit`].

use crate::denylist::Denylist;
use crate::intent::{IntentPolicy, DEFAULT_INTENT_THRESHOLD};
use crate::patterns::PatternRegistry;
use crate::repair::RepairSettings;
use crate::toolkit::Toolkit;
use crate::types::Catalog;
use crate::validate::{ValidationRules, DEFAULT_MIN_LENGTH, SHORT_FORM_LABELS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Named starting points for a config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Unknown labels are warned about; repair window 50, tolerance 15.
    #[default]
    Default,
    /// Unknown entity labels and unknown intents are dropped.
    Strict,
    /// Warn only; wider repair window.
    Lenient,
}

impl Profile {
    /// All profiles.
    pub const ALL: [Profile; 3] = [Profile::Default, Profile::Strict, Profile::Lenient];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Profile::Default => "default",
            Profile::Strict => "strict",
            Profile::Lenient => "lenient",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Profile::Default),
            "strict" => Ok(Profile::Strict),
            "lenient" => Ok(Profile::Lenient),
            other => Err(Error::config(format!(
                "unknown profile '{}' (expected default, strict or lenient)",
                other
            ))),
        }
    }
}

/// What to do with an entity label missing from the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLabelPolicy {
    /// Remove the span.
    Drop,
    /// Keep the span, count a warning.
    #[default]
    Warn,
}

/// How backup files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupNaming {
    /// `<file>.backup_<YYYYMMDD_HHMMSS>`
    #[default]
    Timestamped,
    /// `<file>.backup`
    Plain,
}

/// Extra denylist entries layered over the built-in lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DenylistConfig {
    /// Additional common words.
    pub words: Vec<String>,
    /// Additional label -> tokens pairs.
    pub problematic: BTreeMap<String, Vec<String>>,
}

/// Extra catalog labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Additional entity labels.
    pub entity_labels: Vec<String>,
    /// Additional intent labels.
    pub intent_labels: Vec<String>,
}

/// Complete pipeline configuration.
///
/// Scalar fields come first so the TOML rendering keeps tables at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Profile the config was derived from.
    pub profile: Profile,
    /// Minimum trimmed span length in characters.
    pub min_length: usize,
    /// Labels exempt from `min_length`.
    pub short_label_exemptions: Vec<String>,
    /// Unknown entity labels: drop or warn.
    pub unknown_labels: UnknownLabelPolicy,
    /// Remove intent labels missing from the catalog.
    pub drop_unknown_intents: bool,
    /// Intent scores at or above this become 1.0.
    pub intent_threshold: f64,
    /// Backup file naming.
    pub backup: BackupNaming,
    /// Span repair.
    pub repair: RepairSettings,
    /// Extra denylist entries.
    pub denylist: DenylistConfig,
    /// Extra catalog labels.
    pub catalog: CatalogConfig,
    /// Custom label -> regex patterns. Labels are added to the catalog.
    pub patterns: BTreeMap<String, String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Default,
            min_length: DEFAULT_MIN_LENGTH,
            short_label_exemptions: SHORT_FORM_LABELS.iter().map(|s| (*s).to_string()).collect(),
            unknown_labels: UnknownLabelPolicy::Warn,
            drop_unknown_intents: false,
            intent_threshold: DEFAULT_INTENT_THRESHOLD,
            backup: BackupNaming::Timestamped,
            repair: RepairSettings::default(),
            denylist: DenylistConfig::default(),
            catalog: CatalogConfig::default(),
            patterns: BTreeMap::new(),
        }
    }
}

impl AuditConfig {
    /// Config for a named profile.
    #[must_use]
    pub fn from_profile(profile: Profile) -> Self {
        let base = Self {
            profile,
            ..Self::default()
        };
        match profile {
            Profile::Default => base,
            Profile::Strict => Self {
                unknown_labels: UnknownLabelPolicy::Drop,
                drop_unknown_intents: true,
                ..base
            },
            Profile::Lenient => Self {
                unknown_labels: UnknownLabelPolicy::Warn,
                repair: RepairSettings {
                    window: 80,
                    tolerance: 20,
                    ..RepairSettings::default()
                },
                ..base
            },
        }
    }

    /// Parse TOML over the default profile, or over the profile named in
    /// the file.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Self::overlay_toml(s, None)
    }

    /// Parse TOML over `base`. A `profile` key in the file is ignored when a
    /// base profile is given.
    pub fn overlay_toml(s: &str, base: Option<Profile>) -> Result<Self> {
        let overlay: toml::Table =
            toml::from_str(s).map_err(|e| Error::config(format!("invalid TOML: {}", e)))?;

        let profile = match (base, overlay.get("profile")) {
            (Some(p), _) => p,
            (None, Some(toml::Value::String(name))) => name.parse()?,
            (None, Some(other)) => {
                return Err(Error::config(format!("profile must be a string, got {}", other)))
            }
            (None, None) => Profile::Default,
        };

        let mut merged = match toml::Value::try_from(Self::from_profile(profile)) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(Error::config("config did not serialize to a table")),
            Err(e) => return Err(Error::config(e.to_string())),
        };
        merge_tables(&mut merged, overlay);
        merged.insert("profile".into(), toml::Value::String(profile.as_str().into()));

        let config: Self = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file over `base` (see [`overlay_toml`](Self::overlay_toml)).
    pub fn load(path: impl AsRef<Path>, base: Option<Profile>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("loading config from {}", path.display());
        Self::overlay_toml(&content, base)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Reject values no pipeline can run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(Error::config("min_length must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.intent_threshold) {
            return Err(Error::config(format!(
                "intent_threshold must be within [0, 1], got {}",
                self.intent_threshold
            )));
        }
        if self.repair.tolerance > self.repair.window {
            return Err(Error::config(format!(
                "repair.tolerance ({}) exceeds repair.window ({})",
                self.repair.tolerance, self.repair.window
            )));
        }
        Ok(())
    }

    /// Built-in patterns plus custom ones.
    pub fn build_registry(&self) -> Result<PatternRegistry> {
        let mut registry = PatternRegistry::builtin();
        for (label, source) in &self.patterns {
            registry.insert(label, source)?;
        }
        Ok(registry)
    }

    /// Built-in denylist plus configured extras.
    #[must_use]
    pub fn build_denylist(&self) -> Denylist {
        let mut denylist = Denylist::builtin().with_words(&self.denylist.words);
        for (label, tokens) in &self.denylist.problematic {
            denylist = denylist.with_problematic(label, tokens);
        }
        denylist
    }

    /// Built-in catalog plus configured labels and custom-pattern labels.
    #[must_use]
    pub fn build_catalog(&self) -> Catalog {
        Catalog::builtin()
            .with_entity_labels(self.catalog.entity_labels.iter().cloned())
            .with_entity_labels(self.patterns.keys().cloned())
            .with_intent_labels(self.catalog.intent_labels.iter().cloned())
    }

    /// Validation rules.
    #[must_use]
    pub fn rules(&self) -> ValidationRules {
        ValidationRules {
            min_length: self.min_length,
            short_label_exemptions: self.short_label_exemptions.iter().cloned().collect(),
            unknown_labels: self.unknown_labels,
        }
    }

    /// Intent handling.
    #[must_use]
    pub fn intent_policy(&self) -> IntentPolicy {
        IntentPolicy {
            threshold: self.intent_threshold,
            drop_unknown: self.drop_unknown_intents,
        }
    }

    /// Build the runtime objects.
    pub fn toolkit(&self) -> Result<Toolkit> {
        self.validate()?;
        Ok(Toolkit::new(
            self.build_registry()?,
            self.build_denylist(),
            self.build_catalog(),
            self.rules(),
            self.repair,
            self.intent_policy(),
        ))
    }
}

/// Recursively overlay `src` onto `dst`. Tables merge; everything else
/// replaces.
fn merge_tables(dst: &mut toml::Table, src: toml::Table) {
    for (key, value) in src {
        match (dst.get_mut(&key), value) {
            (Some(toml::Value::Table(d)), toml::Value::Table(s)) => merge_tables(d, s),
            (_, value) => {
                dst.insert(key, value);
            }
        }
    }
}
