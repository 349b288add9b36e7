use itertools::Itertools;
use tree_sitter::Node;

use crate::descriptors::MODIFIERS_ORDER;
use crate::diagnostics::SourceSpan;
use crate::error::ClippyResult;
use crate::lint::{LintContext, LintDescriptor, LintRule};
use crate::ordering::{MODIFIERS, is_canonically_ordered};
use crate::syntax::{SyntaxElement, modifier_keywords, modifiers};

// ============================================================================
// ModifiersOrderLint - Preview
// ============================================================================

/// `static public void Foo()` → `public static void Foo()`.
pub struct ModifiersOrderLint;

const DECLARATIONS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "record_declaration",
    "method_declaration",
    "property_declaration",
    "field_declaration",
    "event_declaration",
    "event_field_declaration",
    "indexer_declaration",
    "constructor_declaration",
];

static MODIFIERS_ORDER_LINTS: &[&LintDescriptor] = &[&MODIFIERS_ORDER];

impl LintRule for ModifiersOrderLint {
    fn descriptors(&self) -> &'static [&'static LintDescriptor] {
        MODIFIERS_ORDER_LINTS
    }

    fn element_kinds(&self) -> &'static [&'static str] {
        DECLARATIONS
    }

    fn check_element(&self, element: SyntaxElement<'_>, ctx: &mut LintContext<'_>) -> ClippyResult<()> {
        let Some(declaration) = element.as_node() else {
            return Ok(());
        };
        check_modifiers_order(declaration, ctx);
        Ok(())
    }
}

fn check_modifiers_order(declaration: Node<'_>, ctx: &mut LintContext<'_>) {
    let keywords = modifier_keywords(ctx.source(), declaration);
    if keywords.len() < 2 || is_canonically_ordered(&keywords, |k| MODIFIERS.rank(k)) {
        return;
    }
    if ctx.is_suppressed(&MODIFIERS_ORDER) {
        return;
    }

    let nodes = modifiers(declaration);
    let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
        return;
    };
    let expected = keywords
        .iter()
        .sorted_by(|a, b| MODIFIERS.compare(a, b))
        .join(" ");

    ctx.report(
        &MODIFIERS_ORDER,
        SourceSpan::from_bounds(first.start_byte(), last.end_byte()),
        &[&expected],
    );
}
