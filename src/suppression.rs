use std::collections::HashMap;

use crate::annotations::PragmaDirectives;
use crate::level::Severity;
use crate::lint::LintDescriptor;
use crate::parser::Document;
use crate::settings::SettingsSnapshot;

/// Decides whether a lint may report in one document during one pass.
///
/// The policy is created per (document, pass), so its cache is keyed by lint
/// id alone and dies with the pass. Never keep one across passes: the settings
/// it was built from may have changed.
#[derive(Debug)]
pub struct SuppressionPolicy<'a> {
    settings: &'a SettingsSnapshot,
    pragmas: PragmaDirectives,
    cache: HashMap<&'static str, Option<Severity>>,
}

impl<'a> SuppressionPolicy<'a> {
    pub fn new(settings: &'a SettingsSnapshot, source: &str) -> Self {
        Self::with_pragmas(settings, PragmaDirectives::parse(source))
    }

    /// Policy for a parsed document; quoted pragma lookalikes are ignored.
    pub fn for_document(settings: &'a SettingsSnapshot, document: &Document) -> Self {
        Self::with_pragmas(settings, PragmaDirectives::from_document(document))
    }

    fn with_pragmas(settings: &'a SettingsSnapshot, pragmas: PragmaDirectives) -> Self {
        Self {
            settings,
            pragmas,
            cache: HashMap::new(),
        }
    }

    /// Severity the lint reports with in this document, `None` when disabled.
    pub fn effective_severity(&mut self, lint: &'static LintDescriptor) -> Option<Severity> {
        let settings = self.settings;
        *self
            .cache
            .entry(lint.id)
            .or_insert_with(|| settings.effective_severity(lint))
    }

    /// Descriptor-wide check: configuration turned the lint off.
    pub fn is_suppressed(&mut self, lint: &'static LintDescriptor) -> bool {
        self.effective_severity(lint).is_none()
    }

    /// Short-circuiting AND over [`Self::is_suppressed`].
    pub fn are_all_suppressed(&mut self, lints: &[&'static LintDescriptor]) -> bool {
        lints.iter().all(|&lint| self.is_suppressed(lint))
    }

    /// Position check: an inline `#pragma warning disable` covers `offset`.
    pub fn is_suppressed_at(&self, lint: &LintDescriptor, offset: usize) -> bool {
        !self.pragmas.is_empty() && self.pragmas.is_disabled_at(lint.id, offset)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{
        HIDES_INHERITED_MEMBER, HIDES_NON_VIRTUAL_MEMBER, NESTED_CONDITIONAL_EXPRESSION,
    };
    use crate::level::LintLevel;

    #[test]
    fn caches_per_lint() {
        let settings = SettingsSnapshot::default();
        let mut policy = SuppressionPolicy::new(&settings, "");
        assert!(!policy.is_suppressed(&HIDES_INHERITED_MEMBER));
        assert!(!policy.is_suppressed(&HIDES_INHERITED_MEMBER));
        assert_eq!(policy.cached_len(), 1);
    }

    #[test]
    fn all_suppressed_requires_every_lint_off() {
        let settings = SettingsSnapshot::default()
            .with_level(HIDES_INHERITED_MEMBER.id, LintLevel::None)
            .with_level(HIDES_NON_VIRTUAL_MEMBER.id, LintLevel::None);
        let mut policy = SuppressionPolicy::new(&settings, "");
        assert!(policy.are_all_suppressed(&[&HIDES_INHERITED_MEMBER, &HIDES_NON_VIRTUAL_MEMBER]));
        assert!(
            !policy.are_all_suppressed(&[&HIDES_INHERITED_MEMBER, &NESTED_CONDITIONAL_EXPRESSION])
        );
    }

    #[test]
    fn all_suppressed_short_circuits() {
        let settings = SettingsSnapshot::default();
        let mut policy = SuppressionPolicy::new(&settings, "");
        assert!(!policy.are_all_suppressed(&[&HIDES_INHERITED_MEMBER, &NESTED_CONDITIONAL_EXPRESSION]));
        // The first lint is enabled, so the second is never looked up.
        assert_eq!(policy.cached_len(), 1);
    }

    #[test]
    fn pragma_regions_suppress_by_position() {
        let src = "#pragma warning disable nested_conditional_expression\nx\n";
        let settings = SettingsSnapshot::default();
        let policy = SuppressionPolicy::new(&settings, src);
        let x = src.find('x').unwrap();
        assert!(policy.is_suppressed_at(&NESTED_CONDITIONAL_EXPRESSION, x));
        assert!(!policy.is_suppressed_at(&HIDES_INHERITED_MEMBER, x));
    }
}
