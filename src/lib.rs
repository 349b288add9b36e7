//! Sharp Clippy: a diagnostic and auto-fix engine for C# syntax trees.
//!
//! [`LintEngine`] parses a document, runs the registered rules through the
//! tree, symbol and node phases and returns diagnostics. [`fixer::FixEngine`]
//! turns individual diagnostics into fix candidates afterwards.

pub mod annotations;
pub mod config;
pub mod descriptors;
pub mod diagnostics;
pub mod error;
pub mod fix;
pub mod fixer;
pub mod fixes;
pub mod level;
pub mod lint;
pub mod ordering;
pub mod parser;
pub mod rules;
pub mod semantic;
pub mod settings;
pub mod suppression;
pub mod syntax;
pub mod telemetry;
pub mod visitor;

use std::sync::Arc;

use crate::diagnostics::Diagnostic;
use crate::error::{ClippyError, ClippyResult};
use crate::fixer::FixEngine;
use crate::lint::{
    AnalysisPhase, CancellationToken, LintContext, LintRegistry, LintRule, isolate_rule_failure,
};
use crate::parser::Document;
use crate::semantic::Compilation;
use crate::settings::SettingsSnapshot;
use crate::visitor::{ElementDispatch, walk_tree};

/// Engine orchestrates linting by running registered rules over documents.
///
/// The engine holds no per-document state, so one instance can analyze many
/// documents concurrently.
pub struct LintEngine {
    registry: LintRegistry,
    settings: Arc<SettingsSnapshot>,
}

impl LintEngine {
    /// Create a new engine with default lint settings.
    pub fn new(registry: LintRegistry) -> Self {
        Self::new_with_settings(registry, SettingsSnapshot::default())
    }

    /// Create a new engine with explicit lint settings (e.g. from config).
    pub fn new_with_settings(registry: LintRegistry, settings: SettingsSnapshot) -> Self {
        Self {
            registry,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &Arc<SettingsSnapshot> {
        &self.settings
    }

    pub fn registry(&self) -> &LintRegistry {
        &self.registry
    }

    /// Lint a single in-memory source string and return diagnostics.
    pub fn lint_source(&self, source: &str) -> ClippyResult<Vec<Diagnostic>> {
        let document = Document::parse(source)?;
        self.lint_document(&document)
    }

    pub fn lint_document(&self, document: &Document) -> ClippyResult<Vec<Diagnostic>> {
        self.lint_document_with_cancellation(document, &CancellationToken::new())
    }

    /// Lint `document`, aborting with [`ClippyError::Cancelled`] once
    /// `cancellation` fires. A cancelled run returns no diagnostics.
    pub fn lint_document_with_cancellation(
        &self,
        document: &Document,
        cancellation: &CancellationToken,
    ) -> ClippyResult<Vec<Diagnostic>> {
        let result = self.run_rules(document, cancellation);
        if let Err(ClippyError::Cancelled) = &result {
            tracing::debug!(file = document.file(), "analysis cancelled");
        }
        result
    }

    fn run_rules(
        &self,
        document: &Document,
        cancellation: &CancellationToken,
    ) -> ClippyResult<Vec<Diagnostic>> {
        cancellation.check()?;

        let compilation = Compilation::from_document(document);
        let mut ctx = LintContext::new(document, &compilation, &self.settings, cancellation.clone());
        let root = document.root();

        let mut active: Vec<&dyn LintRule> = Vec::new();
        for rule in self.registry.rules() {
            if ctx.are_all_suppressed(rule.descriptors()) {
                let lint = rule.descriptors().first().map_or("<unnamed>", |d| d.id);
                tracing::debug!(lint, "all diagnostics suppressed; skipping rule");
                continue;
            }
            active.push(rule);
        }
        if active.is_empty() {
            return Ok(Vec::new());
        }

        crate::instrument_block!("tree", {
            ctx.enter_phase(AnalysisPhase::Tree);
            for rule in &active {
                ctx.check_cancelled()?;
                isolate_rule_failure(*rule, AnalysisPhase::Tree, rule.check_tree(root, &mut ctx))?;
            }
            Ok::<(), ClippyError>(())
        })?;

        crate::instrument_block!("symbol", {
            ctx.enter_phase(AnalysisPhase::Symbol);
            for member in compilation.members() {
                for rule in &active {
                    ctx.check_cancelled()?;
                    isolate_rule_failure(
                        *rule,
                        AnalysisPhase::Symbol,
                        rule.check_symbol(member, &mut ctx),
                    )?;
                }
            }
            Ok::<(), ClippyError>(())
        })?;

        crate::instrument_block!("node", {
            ctx.enter_phase(AnalysisPhase::Node);
            let dispatch = ElementDispatch::new(&active);
            walk_tree(root, &dispatch, &mut ctx)
        })?;

        Ok(ctx.into_diagnostics())
    }
}

/// Construct a `LintEngine` with every built-in lint and default settings.
pub fn create_default_engine() -> LintEngine {
    LintEngine::new(LintRegistry::default_rules())
}

/// Construct a `FixEngine` with every built-in fix provider.
pub fn create_default_fix_engine(settings: Arc<SettingsSnapshot>) -> FixEngine {
    fixes::builtin_fix_engine(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::HIDES_INHERITED_MEMBER;
    use crate::syntax::node_span;

    static HIDING_ONLY: &[&lint::LintDescriptor] = &[&HIDES_INHERITED_MEMBER];

    struct Failing;

    impl LintRule for Failing {
        fn descriptors(&self) -> &'static [&'static lint::LintDescriptor] {
            HIDING_ONLY
        }

        fn check_tree(&self, _root: tree_sitter::Node<'_>, _ctx: &mut LintContext<'_>) -> ClippyResult<()> {
            Err(ClippyError::rule(HIDES_INHERITED_MEMBER.id, "boom"))
        }
    }

    struct ReportsRoot;

    impl LintRule for ReportsRoot {
        fn descriptors(&self) -> &'static [&'static lint::LintDescriptor] {
            HIDING_ONLY
        }

        fn check_tree(&self, root: tree_sitter::Node<'_>, ctx: &mut LintContext<'_>) -> ClippyResult<()> {
            ctx.report(&HIDES_INHERITED_MEMBER, node_span(root), &[&"a", &"b"]);
            Ok(())
        }
    }

    #[test]
    fn failing_rule_does_not_stop_others() {
        let engine = LintEngine::new(LintRegistry::new().with_rule(Failing).with_rule(ReportsRoot));
        let diags = engine.lint_source("class A { }").unwrap();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn cancelled_run_reports_nothing() {
        let engine = LintEngine::new(LintRegistry::new().with_rule(ReportsRoot));
        let doc = Document::parse("class A { }").unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = engine.lint_document_with_cancellation(&doc, &token);
        assert!(matches!(result, Err(ClippyError::Cancelled)));
    }

    #[test]
    fn suppressed_rules_are_skipped() {
        let settings = SettingsSnapshot::default().disable([HIDES_INHERITED_MEMBER.id.to_string()]);
        let engine =
            LintEngine::new_with_settings(LintRegistry::new().with_rule(Failing), settings);
        assert!(engine.lint_source("class A { }").unwrap().is_empty());
    }
}
