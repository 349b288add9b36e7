//! Built-in fix providers.

use std::sync::Arc;

use tree_sitter::Node;

use crate::descriptors::HIDES_INHERITED_MEMBER;
use crate::error::{ClippyError, ClippyResult};
use crate::fix::{FixCandidate, TextEdit};
use crate::fixer::{FixContext, FixEngine, FixProvider};
use crate::ordering::MODIFIERS;
use crate::settings::SettingsSnapshot;
use crate::syntax::{first_non_attribute_child, modifier_keywords, modifiers};

pub const ADD_OVERRIDE_MODIFIER: &str = "add_override_modifier";
pub const ADD_NEW_MODIFIER: &str = "add_new_modifier";

struct ModifierVariant {
    variant: &'static str,
    keyword: &'static str,
    title: &'static str,
}

const OVERRIDE: ModifierVariant = ModifierVariant {
    variant: ADD_OVERRIDE_MODIFIER,
    keyword: "override",
    title: "Add 'override' modifier",
};

const NEW: ModifierVariant = ModifierVariant {
    variant: ADD_NEW_MODIFIER,
    keyword: "new",
    title: "Add 'new' modifier",
};

/// Resolves member hiding by adding `override` or `new` to the hiding member.
pub struct HiddenMemberModifierFix;

impl HiddenMemberModifierFix {
    fn variants(lint_id: &str) -> &'static [ModifierVariant] {
        if lint_id == HIDES_INHERITED_MEMBER.id {
            &[OVERRIDE, NEW]
        } else {
            &[NEW]
        }
    }
}

impl FixProvider for HiddenMemberModifierFix {
    fn fixable_lints(&self) -> &'static [&'static str] {
        &["hides_inherited_member", "hides_non_virtual_member"]
    }

    fn provide(&self, ctx: &FixContext<'_>, out: &mut Vec<FixCandidate>) -> ClippyResult<()> {
        let lint = ctx.diagnostic.id();
        let declaration = ctx.anchor_declaration()?;

        for v in Self::variants(lint) {
            if !ctx.is_enabled(v.variant) {
                continue;
            }
            ctx.cancellation.check()?;

            let edit = insert_modifier(ctx.source(), declaration, v.keyword).ok_or(
                ClippyError::AnchorNotFound {
                    lint,
                    span: ctx.diagnostic.span(),
                },
            )?;
            out.push(FixCandidate::new(v.title, lint, v.variant, vec![edit]));
        }

        Ok(())
    }
}

/// Edit that adds `keyword` to the declaration's modifier list at its
/// canonical position. Existing modifiers and the whitespace between them are
/// left alone.
///
/// Returns `None` when the keyword is already present or the declaration has
/// nothing to attach a modifier to.
pub fn insert_modifier(source: &str, declaration: Node<'_>, keyword: &str) -> Option<TextEdit> {
    let existing = modifier_keywords(source, declaration);
    if existing.contains(&keyword) {
        return None;
    }

    let nodes = modifiers(declaration);
    let index = MODIFIERS.insertion_index(&existing, keyword);

    if let Some(next) = nodes.get(index) {
        Some(TextEdit::insert(next.start_byte(), format!("{keyword} ")))
    } else if let Some(last) = nodes.last() {
        Some(TextEdit::insert(last.end_byte(), format!(" {keyword}")))
    } else {
        let first = first_non_attribute_child(declaration)?;
        Some(TextEdit::insert(first.start_byte(), format!("{keyword} ")))
    }
}

/// Fix engine with every built-in provider.
pub fn builtin_fix_engine(settings: Arc<SettingsSnapshot>) -> FixEngine {
    FixEngine::new(settings).with_provider(HiddenMemberModifierFix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::HIDES_NON_VIRTUAL_MEMBER;
    use crate::fix::apply_edits;
    use crate::parser::Document;
    use crate::syntax::{is_member_declaration, walk};

    fn first_member(doc: &Document) -> Node<'_> {
        let mut found = None;
        walk(doc.root(), &mut |n| {
            if found.is_none() && is_member_declaration(n.kind()) {
                found = Some(n);
            }
        });
        found.expect("member declaration")
    }

    fn add(src: &str, keyword: &str) -> Option<String> {
        let doc = Document::parse(src).unwrap();
        let edit = insert_modifier(src, first_member(&doc), keyword)?;
        Some(apply_edits(src, &[edit]).unwrap())
    }

    #[test]
    fn appends_after_last_modifier() {
        assert_eq!(
            add("class D { public void Foo() { } }", "override").as_deref(),
            Some("class D { public override void Foo() { } }")
        );
    }

    #[test]
    fn inserts_before_higher_ranked_modifier() {
        assert_eq!(
            add("class D { public static void Foo() { } }", "new").as_deref(),
            Some("class D { public static new void Foo() { } }")
        );
        assert_eq!(
            add("class D { static  readonly int x; }", "new").as_deref(),
            Some("class D { static  new readonly int x; }")
        );
    }

    #[test]
    fn inserts_before_type_without_modifiers() {
        assert_eq!(
            add("class D { void Foo() { } }", "new").as_deref(),
            Some("class D { new void Foo() { } }")
        );
        assert_eq!(
            add("class D { [Obsolete] void Foo() { } }", "new").as_deref(),
            Some("class D { [Obsolete] new void Foo() { } }")
        );
    }

    #[test]
    fn fixable_lints_name_the_hiding_descriptors() {
        assert_eq!(
            HiddenMemberModifierFix.fixable_lints(),
            [HIDES_INHERITED_MEMBER.id, HIDES_NON_VIRTUAL_MEMBER.id]
        );
    }

    #[test]
    fn present_keyword_is_not_added_twice() {
        assert_eq!(add("class D { public new void Foo() { } }", "new"), None);
    }
}
