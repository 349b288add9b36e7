use crate::descriptors::{HIDES_INHERITED_MEMBER, HIDES_NON_VIRTUAL_MEMBER};
use crate::error::ClippyResult;
use crate::lint::{LintContext, LintDescriptor, LintRule};
use crate::semantic::MemberSymbol;

// ============================================================================
// HiddenMemberLint
// ============================================================================

/// A member that shares a signature with a visible base member without
/// saying `override` or `new`.
pub struct HiddenMemberLint;

static HIDING_LINTS: &[&LintDescriptor] = &[&HIDES_INHERITED_MEMBER, &HIDES_NON_VIRTUAL_MEMBER];

impl LintRule for HiddenMemberLint {
    fn descriptors(&self) -> &'static [&'static LintDescriptor] {
        HIDING_LINTS
    }

    fn check_symbol(&self, symbol: &MemberSymbol, ctx: &mut LintContext<'_>) -> ClippyResult<()> {
        if symbol.has_modifier("override") || symbol.has_modifier("new") {
            return Ok(());
        }

        let compilation = ctx.compilation();
        let Some(hidden) = compilation.hidden_base_member(symbol) else {
            return Ok(());
        };

        // A static member can never override.
        let lint = if hidden.is_overridable() && !symbol.is_static() {
            &HIDES_INHERITED_MEMBER
        } else {
            &HIDES_NON_VIRTUAL_MEMBER
        };
        if ctx.is_suppressed(lint) {
            return Ok(());
        }

        let base_type = &compilation.containing_type(hidden).name;
        ctx.report_full(
            lint,
            symbol.name_span,
            &[hidden.name_span],
            &[("base_type", base_type.as_str())],
            &[
                &compilation.display_name(symbol),
                &compilation.display_name(hidden),
            ],
        );
        Ok(())
    }
}
