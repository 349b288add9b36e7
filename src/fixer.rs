//! Fix action engine.
//!
//! Runs strictly after analysis. Given one diagnostic, every registered
//! [`FixProvider`] that handles its lint id is asked for candidates; the
//! result is deduplicated by equivalence key and returned in provider order.

use std::sync::Arc;

use itertools::Itertools;
use tree_sitter::Node;

use crate::diagnostics::Diagnostic;
use crate::error::{ClippyError, ClippyResult};
use crate::fix::{FixCandidate, TextEdit, apply_edits, reparse_checked};
use crate::lint::CancellationToken;
use crate::parser::Document;
use crate::settings::SettingsSnapshot;
use crate::syntax::{covering_node, enclosing_member_declaration};

/// Read-only inputs for building fixes for one diagnostic.
pub struct FixContext<'a> {
    pub document: &'a Document,
    pub diagnostic: &'a Diagnostic,
    pub settings: &'a SettingsSnapshot,
    pub cancellation: &'a CancellationToken,
}

impl<'a> FixContext<'a> {
    pub fn source(&self) -> &'a str {
        self.document.source()
    }

    /// Whether the fix variant may be offered. Check before building it.
    pub fn is_enabled(&self, variant: &str) -> bool {
        let enabled = self.settings.is_fix_enabled(variant);
        if !enabled {
            tracing::debug!(lint = self.diagnostic.id(), variant, "fix variant disabled");
        }
        enabled
    }

    /// The member declaration the diagnostic's primary span sits in.
    ///
    /// # Errors
    ///
    /// [`ClippyError::AnchorNotFound`] when the span does not land inside a
    /// member declaration of this document.
    pub fn anchor_declaration(&self) -> ClippyResult<Node<'a>> {
        let span = self.diagnostic.span();
        covering_node(self.document.root(), span)
            .and_then(enclosing_member_declaration)
            .ok_or(ClippyError::AnchorNotFound {
                lint: self.diagnostic.id(),
                span,
            })
    }
}

/// Produces fix candidates for the lints it declares.
pub trait FixProvider: Send + Sync {
    fn fixable_lints(&self) -> &'static [&'static str];

    /// Push candidates for `ctx.diagnostic` onto `out`, in a fixed order.
    /// Variants disabled in the settings must not be constructed.
    fn provide(&self, ctx: &FixContext<'_>, out: &mut Vec<FixCandidate>) -> ClippyResult<()>;
}

pub struct FixEngine {
    providers: Vec<Box<dyn FixProvider>>,
    settings: Arc<SettingsSnapshot>,
}

impl FixEngine {
    pub fn new(settings: Arc<SettingsSnapshot>) -> Self {
        Self {
            providers: Vec::new(),
            settings,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl FixProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    pub fn handles(&self, lint_id: &str) -> bool {
        self.providers
            .iter()
            .any(|p| p.fixable_lints().contains(&lint_id))
    }

    /// Candidates for `diagnostic`, surfacing why none could be built.
    ///
    /// # Errors
    ///
    /// Anchor resolution failures and cancellation are returned as-is.
    pub fn try_candidates(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        cancellation: &CancellationToken,
    ) -> ClippyResult<Vec<FixCandidate>> {
        let ctx = FixContext {
            document,
            diagnostic,
            settings: &self.settings,
            cancellation,
        };

        let mut out = Vec::new();
        for provider in &self.providers {
            if !provider.fixable_lints().contains(&diagnostic.id()) {
                continue;
            }
            cancellation.check()?;
            provider.provide(&ctx, &mut out)?;
        }
        cancellation.check()?;

        Ok(out
            .into_iter()
            .unique_by(|c| c.equivalence_key.clone())
            .collect())
    }

    /// Candidates for `diagnostic`; empty when the engine declines.
    pub fn candidates(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        cancellation: &CancellationToken,
    ) -> Vec<FixCandidate> {
        match self.try_candidates(document, diagnostic, cancellation) {
            Ok(candidates) => candidates,
            Err(ClippyError::Cancelled) => {
                tracing::debug!(lint = diagnostic.id(), "fix construction cancelled");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(lint = diagnostic.id(), error = %err, "declining to offer fixes");
                Vec::new()
            }
        }
    }

    /// Apply the candidate with `equivalence_key` for every diagnostic that
    /// offers one, in a single pass over `document`.
    ///
    /// # Errors
    ///
    /// Fails on cancellation, on conflicting edits and on a malformed result.
    pub fn fix_all(
        &self,
        document: &Document,
        diagnostics: &[Diagnostic],
        equivalence_key: &str,
        cancellation: &CancellationToken,
    ) -> ClippyResult<Document> {
        let mut chosen = Vec::new();
        for diagnostic in diagnostics {
            cancellation.check()?;
            if let Some(candidate) = self
                .candidates(document, diagnostic, cancellation)
                .into_iter()
                .find(|c| c.equivalence_key == equivalence_key)
            {
                chosen.push(candidate);
            }
        }
        cancellation.check()?;

        let refs: Vec<&FixCandidate> = chosen.iter().collect();
        apply_candidates(document, &refs)
    }
}

/// Apply several candidates' edits to one document at once.
///
/// # Errors
///
/// [`crate::fix::FixError::OverlappingEdits`] when two candidates touch the
/// same text, or a malformed-result error when the combined output parses
/// worse than the input.
pub fn apply_candidates(document: &Document, candidates: &[&FixCandidate]) -> ClippyResult<Document> {
    let edits: Vec<TextEdit> = candidates
        .iter()
        .flat_map(|c| c.edits.iter().cloned())
        .collect();
    let text = apply_edits(document.source(), &edits)?;
    reparse_checked(document, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::HIDES_NON_VIRTUAL_MEMBER;
    use crate::diagnostics::{LineIndex, Location, SourceSpan};
    use std::collections::BTreeMap;

    struct Twice;

    impl FixProvider for Twice {
        fn fixable_lints(&self) -> &'static [&'static str] {
            &["hides_non_virtual_member"]
        }

        fn provide(&self, ctx: &FixContext<'_>, out: &mut Vec<FixCandidate>) -> ClippyResult<()> {
            let decl = ctx.anchor_declaration()?;
            for _ in 0..2 {
                out.push(FixCandidate::new(
                    "Make public",
                    HIDES_NON_VIRTUAL_MEMBER.id,
                    "make_public",
                    vec![TextEdit::insert(decl.start_byte(), "public ")],
                ));
            }
            Ok(())
        }
    }

    fn diagnostic_at(doc: &Document, span: SourceSpan) -> Diagnostic {
        let index = LineIndex::new(doc.source());
        Diagnostic {
            lint: &HIDES_NON_VIRTUAL_MEMBER,
            severity: HIDES_NON_VIRTUAL_MEMBER.default_severity,
            location: Location::resolve(None, span, &index),
            additional_locations: Vec::new(),
            message_args: Vec::new(),
            properties: BTreeMap::new(),
            message: String::new(),
        }
    }

    fn engine() -> FixEngine {
        FixEngine::new(Arc::new(SettingsSnapshot::default())).with_provider(Twice)
    }

    #[test]
    fn duplicate_keys_are_collapsed() {
        let doc = Document::parse("class A { void Foo() { } }").unwrap();
        let diag = diagnostic_at(&doc, SourceSpan::new(15, 3));
        let candidates = engine().candidates(&doc, &diag, &CancellationToken::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].equivalence_key,
            "hides_non_virtual_member.make_public"
        );
    }

    #[test]
    fn missing_anchor_declines() {
        let doc = Document::parse("class A { void Foo() { } }").unwrap();
        let diag = diagnostic_at(&doc, SourceSpan::new(0, 5));
        let token = CancellationToken::new();

        let err = engine().try_candidates(&doc, &diag, &token).unwrap_err();
        assert!(matches!(err, ClippyError::AnchorNotFound { .. }));
        assert!(engine().candidates(&doc, &diag, &token).is_empty());
    }

    #[test]
    fn cancelled_construction_yields_nothing() {
        let doc = Document::parse("class A { void Foo() { } }").unwrap();
        let diag = diagnostic_at(&doc, SourceSpan::new(15, 3));
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            engine().try_candidates(&doc, &diag, &token),
            Err(ClippyError::Cancelled)
        ));
        assert!(engine().candidates(&doc, &diag, &token).is_empty());
    }

    #[test]
    fn apply_candidates_rejects_conflicts() {
        let doc = Document::parse("class A { void Foo() { } }").unwrap();
        let a = FixCandidate::new("a", "l", "a", vec![TextEdit::insert(10, "public ")]);
        let b = FixCandidate::new("b", "l", "b", vec![TextEdit::insert(10, "static ")]);
        assert!(matches!(
            apply_candidates(&doc, &[&a, &b]),
            Err(ClippyError::Fix(crate::fix::FixError::OverlappingEdits(10)))
        ));
    }
}
