use std::collections::HashMap;

use crate::level::{LintLevel, Severity};
use crate::lint::{LintDescriptor, RuleGroup};

/// Read-only configuration for one analysis pass.
///
/// Built with the consuming `with_*` methods, then shared (usually behind an
/// `Arc`) by every unit analyzed in the pass. Picking up changed configuration
/// means building a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    levels: HashMap<String, LintLevel>,
    fixes: HashMap<String, bool>,
    preview: bool,
}

impl SettingsSnapshot {
    /// Lint and category levels, keyed by lint id or category name.
    #[must_use]
    pub fn with_config_levels(mut self, levels: HashMap<String, LintLevel>) -> Self {
        self.levels.extend(levels);
        self
    }

    #[must_use]
    pub fn with_level(mut self, key: impl Into<String>, level: LintLevel) -> Self {
        self.levels.insert(key.into(), level);
        self
    }

    #[must_use]
    pub fn disable(mut self, disabled: impl IntoIterator<Item = String>) -> Self {
        for id in disabled {
            self.levels.insert(id, LintLevel::None);
        }
        self
    }

    /// Fix variant toggles, keyed by variant id.
    #[must_use]
    pub fn with_fix_toggles(mut self, toggles: HashMap<String, bool>) -> Self {
        self.fixes.extend(toggles);
        self
    }

    #[must_use]
    pub fn disable_fix(mut self, variant: impl Into<String>) -> Self {
        self.fixes.insert(variant.into(), false);
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn preview(&self) -> bool {
        self.preview
    }

    /// Level set explicitly for the lint id, falling back to its category.
    pub fn configured_level(&self, lint: &LintDescriptor) -> Option<LintLevel> {
        self.levels
            .get(lint.id)
            .or_else(|| self.levels.get(lint.category.as_str()))
            .copied()
    }

    /// Severity the lint reports with, or `None` when it is turned off.
    /// Preview lints are off unless preview is enabled.
    pub fn effective_severity(&self, lint: &LintDescriptor) -> Option<Severity> {
        if lint.group == RuleGroup::Preview && !self.preview {
            return None;
        }
        match self.configured_level(lint) {
            Some(level) => level.severity(),
            None => Some(lint.default_severity),
        }
    }

    /// Fix variants are enabled unless explicitly turned off.
    pub fn is_fix_enabled(&self, variant: &str) -> bool {
        self.fixes.get(variant).copied().unwrap_or(true)
    }
}
