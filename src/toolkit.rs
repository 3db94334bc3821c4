//! Runtime objects built from an [`AuditConfig`](crate::AuditConfig).

use crate::denylist::Denylist;
use crate::intent::IntentPolicy;
use crate::patterns::PatternRegistry;
use crate::repair::{RepairSettings, SpanRepairer};
use crate::types::Catalog;
use crate::validate::{SpanValidator, ValidationRules};

/// Immutable pattern registry, denylist and catalog for one configuration.
///
/// Build once, then hand out validators and repairers that borrow from it.
/// Two toolkits with different configurations coexist without interfering.
#[derive(Debug, Clone)]
pub struct Toolkit {
    patterns: PatternRegistry,
    denylist: Denylist,
    catalog: Catalog,
    rules: ValidationRules,
    repair: RepairSettings,
    intents: IntentPolicy,
}

impl Toolkit {
    /// Assemble a toolkit from its parts.
    #[must_use]
    pub fn new(
        patterns: PatternRegistry,
        denylist: Denylist,
        catalog: Catalog,
        rules: ValidationRules,
        repair: RepairSettings,
        intents: IntentPolicy,
    ) -> Self {
        Self {
            patterns,
            denylist,
            catalog,
            rules,
            repair,
            intents,
        }
    }

    /// Toolkit with built-in tables and default settings.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            PatternRegistry::builtin(),
            Denylist::builtin(),
            Catalog::builtin(),
            ValidationRules::default(),
            RepairSettings::default(),
            IntentPolicy::default(),
        )
    }

    /// A validator borrowing this toolkit.
    #[must_use]
    pub fn validator(&self) -> SpanValidator<'_> {
        SpanValidator::new(&self.patterns, &self.denylist, &self.catalog, &self.rules)
    }

    /// A repairer borrowing this toolkit.
    #[must_use]
    pub fn repairer(&self) -> SpanRepairer<'_> {
        SpanRepairer::new(self.validator(), self.repair)
    }

    /// Pattern registry.
    #[must_use]
    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    /// Denylist.
    #[must_use]
    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Label catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Intent handling.
    #[must_use]
    pub fn intent_policy(&self) -> IntentPolicy {
        self.intents
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Span;
    use crate::AuditConfig;

    #[test]
    fn builtin_matches_default_config() {
        let from_config = AuditConfig::default().toolkit().unwrap();
        let builtin = Toolkit::builtin();
        assert_eq!(from_config.denylist(), builtin.denylist());
        assert_eq!(from_config.catalog(), builtin.catalog());
        assert_eq!(from_config.patterns().len(), builtin.patterns().len());
    }

    #[test]
    fn toolkits_are_independent() {
        let mut config = AuditConfig::default();
        config.denylist.words.push("mimikatz".into());
        let strict = config.toolkit().unwrap();
        let plain = Toolkit::builtin();

        let span = Span::new(0, 8, "TOOL");
        assert!(plain.validator().validate("mimikatz ran", &span).is_valid());
        assert!(!strict.validator().validate("mimikatz ran", &span).is_valid());
    }
}
