use tree_sitter::Node;

use crate::descriptors::NESTED_CONDITIONAL_EXPRESSION;
use crate::error::ClippyResult;
use crate::lint::{LintContext, LintDescriptor, LintRule};
use crate::syntax::{
    CONDITIONAL_EXPRESSION, SyntaxElement, node_span, operands, walk_down_parentheses,
    walk_up_parentheses,
};

// ============================================================================
// NestedConditionalLint
// ============================================================================

/// `a ? b : (c ? d : e)` and friends. Reports once per chain, at the
/// outermost conditional.
pub struct NestedConditionalLint;

static NESTED_CONDITIONAL_LINTS: &[&LintDescriptor] = &[&NESTED_CONDITIONAL_EXPRESSION];

impl LintRule for NestedConditionalLint {
    fn descriptors(&self) -> &'static [&'static LintDescriptor] {
        NESTED_CONDITIONAL_LINTS
    }

    fn element_kinds(&self) -> &'static [&'static str] {
        &[CONDITIONAL_EXPRESSION]
    }

    fn check_element(&self, element: SyntaxElement<'_>, ctx: &mut LintContext<'_>) -> ClippyResult<()> {
        let Some(node) = element.as_node() else {
            return Ok(());
        };
        if !is_outermost(node) {
            return Ok(());
        }
        if ctx.is_suppressed(&NESTED_CONDITIONAL_EXPRESSION) {
            return Ok(());
        }

        let depth = nesting_depth(node, ctx)?;
        if depth < 2 {
            return Ok(());
        }

        let depth_text = depth.to_string();
        ctx.report_full(
            &NESTED_CONDITIONAL_EXPRESSION,
            node_span(node),
            &[],
            &[("depth", depth_text.as_str())],
            &[&depth],
        );
        Ok(())
    }
}

/// Not itself an operand of another conditional, parentheses aside.
fn is_outermost(node: Node<'_>) -> bool {
    walk_up_parentheses(node)
        .parent()
        .is_none_or(|parent| parent.kind() != CONDITIONAL_EXPRESSION)
}

/// Levels of conditionals nested directly through operands, counting `node`.
fn nesting_depth(node: Node<'_>, ctx: &LintContext<'_>) -> ClippyResult<usize> {
    ctx.check_cancelled()?;
    let mut deepest = 0;
    for operand in operands(node) {
        let inner = walk_down_parentheses(operand);
        if inner.kind() == CONDITIONAL_EXPRESSION {
            deepest = deepest.max(nesting_depth(inner, ctx)?);
        }
    }
    Ok(deepest + 1)
}
