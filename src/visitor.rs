use std::collections::HashMap;

use tree_sitter::Node;

use crate::error::ClippyResult;
use crate::lint::{AnalysisPhase, LintContext, LintRule, isolate_rule_failure};
use crate::syntax::{SyntaxElement, WHITESPACE, whitespace_between};

/// Element kind → rules that registered for it, in registry order.
pub struct ElementDispatch<'r> {
    by_kind: HashMap<&'static str, Vec<&'r dyn LintRule>>,
}

impl<'r> ElementDispatch<'r> {
    pub fn new(rules: &[&'r dyn LintRule]) -> Self {
        let mut by_kind: HashMap<&'static str, Vec<&'r dyn LintRule>> = HashMap::new();
        for rule in rules {
            for kind in rule.element_kinds() {
                by_kind.entry(*kind).or_default().push(*rule);
            }
        }
        Self { by_kind }
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    fn rules_for(&self, kind: &str) -> &[&'r dyn LintRule] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    fn wants_whitespace(&self) -> bool {
        self.by_kind.contains_key(WHITESPACE)
    }
}

/// Visit every element under `root` in preorder and hand it to the rules
/// that registered for its kind. Checks cancellation before each element.
///
/// Whitespace between sibling elements is visited as trivia, right before
/// the sibling that follows it, when some rule asked for [`WHITESPACE`].
pub fn walk_tree(
    root: Node<'_>,
    dispatch: &ElementDispatch<'_>,
    ctx: &mut LintContext<'_>,
) -> ClippyResult<()> {
    if dispatch.is_empty() {
        return Ok(());
    }
    walk_node(root, dispatch, ctx)
}

fn walk_node(
    node: Node<'_>,
    dispatch: &ElementDispatch<'_>,
    ctx: &mut LintContext<'_>,
) -> ClippyResult<()> {
    dispatch_element(SyntaxElement::from_node(node), dispatch, ctx)?;

    let mut cursor = node.walk();
    let mut previous_end: Option<usize> = None;
    for child in node.children(&mut cursor) {
        if dispatch.wants_whitespace()
            && let Some(end) = previous_end
            && let Some(trivia) = whitespace_between(ctx.source(), end, child.start_byte())
        {
            dispatch_element(SyntaxElement::Trivia(trivia), dispatch, ctx)?;
        }
        walk_node(child, dispatch, ctx)?;
        previous_end = Some(child.end_byte());
    }
    Ok(())
}

fn dispatch_element(
    element: SyntaxElement<'_>,
    dispatch: &ElementDispatch<'_>,
    ctx: &mut LintContext<'_>,
) -> ClippyResult<()> {
    ctx.check_cancelled()?;
    for rule in dispatch.rules_for(element.kind()) {
        isolate_rule_failure(*rule, AnalysisPhase::Node, rule.check_element(element, ctx))?;
    }
    Ok(())
}
