use std::cell::OnceCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tree_sitter::Node;

use crate::descriptors::DescriptorRegistry;
use crate::diagnostics::{Diagnostic, LineIndex, Location, SourceSpan, format_message};
use crate::error::{ClippyError, ClippyResult};
use crate::level::Severity;
use crate::parser::Document;
use crate::semantic::{Compilation, MemberSymbol};
use crate::settings::SettingsSnapshot;
use crate::suppression::SuppressionPolicy;
use crate::syntax::{SyntaxElement, Trivia, node_span};

// ============================================================================
// Rule Groups (Preview vs Stable)
// ============================================================================

/// Classification of lint rules by stability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum RuleGroup {
    /// Enabled by default.
    #[default]
    Stable,
    /// Requires `preview = true` in config.
    Preview,
}

impl RuleGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleGroup::Stable => "stable",
            RuleGroup::Preview => "preview",
        }
    }
}

// ============================================================================
// Fix availability
// ============================================================================

/// Descriptor for an auto-fix associated with a lint rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixDescriptor {
    /// Whether an auto-fix is available for this lint.
    pub available: bool,
    /// Human-readable description of what the fix does.
    pub description: &'static str,
}

impl FixDescriptor {
    pub const fn safe(description: &'static str) -> Self {
        Self {
            available: true,
            description,
        }
    }

    pub const fn none() -> Self {
        Self {
            available: false,
            description: "",
        }
    }
}

// ============================================================================
// Lint Categories
// ============================================================================

/// High-level categories used to group lints. Category names double as
/// config keys for category-wide levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LintCategory {
    Compiler,
    Design,
    Readability,
    Redundancy,
    Style,
}

impl LintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintCategory::Compiler => "compiler",
            LintCategory::Design => "design",
            LintCategory::Readability => "readability",
            LintCategory::Redundancy => "redundancy",
            LintCategory::Style => "style",
        }
    }
}

/// Static metadata describing a lint rule. Created once, shared by all passes.
#[derive(Debug)]
pub struct LintDescriptor {
    /// Stable, unique identifier; also the config and `#pragma` key.
    pub id: &'static str,
    pub title: &'static str,
    pub category: LintCategory,
    pub default_severity: Severity,
    /// Message template with positional `{0}`, `{1}` placeholders.
    pub message_format: &'static str,
    pub group: RuleGroup,
    pub fix: FixDescriptor,
}

// ============================================================================
// Analysis phases and cancellation
// ============================================================================

/// When a detector hook runs within the analysis of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    /// Once per document, before anything else.
    Tree,
    /// Once per member symbol of the compilation.
    Symbol,
    /// Once per syntax element whose kind the rule registered for.
    Node,
}

impl AnalysisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPhase::Tree => "tree",
            AnalysisPhase::Symbol => "symbol",
            AnalysisPhase::Node => "node",
        }
    }
}

/// Cooperative cancellation flag shared between a host and running analyses.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> ClippyResult<()> {
        if self.is_cancelled() {
            Err(ClippyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Detector contract
// ============================================================================

/// A single lint rule.
///
/// Hooks must not keep state between calls; their only effect is reporting
/// through the [`LintContext`]. Returning `Err` marks the rule as failed for
/// this document without affecting other rules.
pub trait LintRule: Send + Sync {
    /// Every descriptor this rule may report. When all of them are suppressed
    /// the rule is skipped for the document.
    fn descriptors(&self) -> &'static [&'static LintDescriptor];

    /// Element kinds (node kinds, token kinds or `comment`) for [`Self::check_element`].
    fn element_kinds(&self) -> &'static [&'static str] {
        &[]
    }

    fn check_tree(&self, _root: Node<'_>, _ctx: &mut LintContext<'_>) -> ClippyResult<()> {
        Ok(())
    }

    fn check_symbol(&self, _symbol: &MemberSymbol, _ctx: &mut LintContext<'_>) -> ClippyResult<()> {
        Ok(())
    }

    fn check_element(
        &self,
        _element: SyntaxElement<'_>,
        _ctx: &mut LintContext<'_>,
    ) -> ClippyResult<()> {
        Ok(())
    }
}

/// Log and swallow a failed rule hook; cancellation still propagates.
pub(crate) fn isolate_rule_failure(
    rule: &dyn LintRule,
    phase: AnalysisPhase,
    result: ClippyResult<()>,
) -> ClippyResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(ClippyError::Cancelled) => Err(ClippyError::Cancelled),
        Err(err) => {
            let lint = rule.descriptors().first().map_or("<unnamed>", |d| d.id);
            tracing::warn!(lint, phase = phase.as_str(), error = %err, "rule failed; skipping");
            Ok(())
        }
    }
}

// ============================================================================
// Reporting gateway
// ============================================================================

/// Per-document analysis context and the only way detectors report findings.
///
/// Holds the document, its compilation, the pass settings and the
/// cancellation token. Dropped when the document's analysis ends.
pub struct LintContext<'a> {
    document: &'a Document,
    compilation: &'a Compilation,
    suppression: SuppressionPolicy<'a>,
    cancellation: CancellationToken,
    line_index: OnceCell<LineIndex>,
    phase: AnalysisPhase,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LintContext<'a> {
    pub fn new(
        document: &'a Document,
        compilation: &'a Compilation,
        settings: &'a SettingsSnapshot,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            document,
            compilation,
            suppression: SuppressionPolicy::for_document(settings, document),
            cancellation,
            line_index: OnceCell::new(),
            phase: AnalysisPhase::Tree,
            diagnostics: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.document.source()
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub(crate) fn enter_phase(&mut self, phase: AnalysisPhase) {
        tracing::trace!(phase = phase.as_str(), "entering analysis phase");
        self.phase = phase;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn check_cancelled(&self) -> ClippyResult<()> {
        self.cancellation.check()
    }

    pub fn is_suppressed(&mut self, lint: &'static LintDescriptor) -> bool {
        self.suppression.is_suppressed(lint)
    }

    pub fn are_all_suppressed(&mut self, lints: &[&'static LintDescriptor]) -> bool {
        self.suppression.are_all_suppressed(lints)
    }

    /// Report `lint` at `span` with positional message arguments.
    pub fn report(&mut self, lint: &'static LintDescriptor, span: SourceSpan, args: &[&dyn Display]) {
        self.report_full(lint, span, &[], &[], args);
    }

    /// The reporting primitive every other `report_*` method funnels into.
    ///
    /// Does nothing when the lint is suppressed for this document; that check
    /// comes before any argument is formatted or location resolved. Panics when
    /// a span lies outside the document or a property key repeats.
    pub fn report_full(
        &mut self,
        lint: &'static LintDescriptor,
        span: SourceSpan,
        additional: &[SourceSpan],
        properties: &[(&str, &str)],
        args: &[&dyn Display],
    ) {
        let Some(severity) = self.suppression.effective_severity(lint) else {
            return;
        };
        self.emit(lint, severity, span, additional, properties, args);
    }

    pub fn report_node(&mut self, lint: &'static LintDescriptor, node: Node<'_>, args: &[&dyn Display]) {
        let Some(severity) = self.suppression.effective_severity(lint) else {
            return;
        };
        self.emit(lint, severity, node_span(node), &[], &[], args);
    }

    /// Report at an anonymous token (keyword, operator, punctuation).
    pub fn report_token(&mut self, lint: &'static LintDescriptor, token: Node<'_>, args: &[&dyn Display]) {
        self.report_element(lint, SyntaxElement::Token(token), args);
    }

    pub fn report_trivia(&mut self, lint: &'static LintDescriptor, trivia: Trivia, args: &[&dyn Display]) {
        self.report_element(lint, SyntaxElement::Trivia(trivia), args);
    }

    pub fn report_element(
        &mut self,
        lint: &'static LintDescriptor,
        element: SyntaxElement<'_>,
        args: &[&dyn Display],
    ) {
        let Some(severity) = self.suppression.effective_severity(lint) else {
            return;
        };
        self.emit(lint, severity, element.span(), &[], &[], args);
    }

    fn emit(
        &mut self,
        lint: &'static LintDescriptor,
        severity: Severity,
        span: SourceSpan,
        additional: &[SourceSpan],
        properties: &[(&str, &str)],
        args: &[&dyn Display],
    ) {
        let len = self.document.source().len();
        for s in std::iter::once(&span).chain(additional) {
            assert!(
                s.end() <= len,
                "`{}` reported span {}..{} outside document of {len} bytes",
                lint.id,
                s.start,
                s.end()
            );
        }

        if self.suppression.is_suppressed_at(lint, span.start) {
            return;
        }

        let mut props = BTreeMap::new();
        for (key, value) in properties {
            let previous = props.insert((*key).to_string(), (*value).to_string());
            assert!(previous.is_none(), "`{}` repeated property `{key}`", lint.id);
        }

        let message_args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let file = self.document.file().map(str::to_string);
        let index = self
            .line_index
            .get_or_init(|| LineIndex::new(self.document.source()));

        let diagnostic = Diagnostic {
            lint,
            severity,
            location: Location::resolve(file.clone(), span, index),
            additional_locations: additional
                .iter()
                .map(|s| Location::resolve(file.clone(), *s, index))
                .collect(),
            message: format_message(lint.message_format, &message_args),
            message_args,
            properties: props,
        };

        tracing::trace!(lint = lint.id, phase = self.phase.as_str(), start = span.start, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics_len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics ordered by position, then lint id.
    #[must_use]
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by(|a, b| (a.span(), a.id()).cmp(&(b.span(), b.id())));
        self.diagnostics
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of rules run by the engine.
pub struct LintRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for LintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl LintRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static LintDescriptor> + '_ {
        self.rules.iter().flat_map(|r| r.descriptors().iter().copied())
    }

    /// Sorted lookup over the descriptors of the registered rules.
    pub fn descriptor_registry(&self) -> DescriptorRegistry {
        DescriptorRegistry::new(&self.descriptors().collect::<Vec<_>>())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use = "registry should be used to create an engine"]
    pub fn default_rules() -> Self {
        crate::rules::builtin_registry()
    }

    /// Built-in rules narrowed by `only`/`skip` and the preview gate.
    ///
    /// # Errors
    ///
    /// Returns an error if any id in `only` or `skip` is unknown.
    pub fn default_rules_filtered(
        only: &[String],
        skip: &[String],
        preview: bool,
    ) -> ClippyResult<Self> {
        let all = Self::default_rules();
        let known = all.descriptor_registry();

        for id in only.iter().chain(skip) {
            if known.get(id).is_none() {
                return Err(ClippyError::config(format!("unknown lint: {id}")));
            }
        }

        let only: HashSet<&str> = only.iter().map(String::as_str).collect();
        let skip: HashSet<&str> = skip.iter().map(String::as_str).collect();

        let mut reg = Self::new();
        for rule in all.rules {
            let ids = rule.descriptors();
            if !only.is_empty() && !ids.iter().any(|d| only.contains(d.id)) {
                continue;
            }
            if ids.iter().all(|d| skip.contains(d.id)) {
                continue;
            }
            if !preview && ids.iter().all(|d| d.group == RuleGroup::Preview) {
                continue;
            }
            reg.rules.push(rule);
        }

        Ok(reg)
    }
}
