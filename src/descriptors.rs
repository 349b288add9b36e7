//! Static catalog of every lint this crate can report.

use crate::level::Severity;
use crate::lint::{FixDescriptor, LintCategory, LintDescriptor, RuleGroup};

// ============================================================================
// Compiler-style member hiding
// ============================================================================

pub static HIDES_INHERITED_MEMBER: LintDescriptor = LintDescriptor {
    id: "hides_inherited_member",
    title: "Member hides overridable inherited member",
    category: LintCategory::Compiler,
    default_severity: Severity::Warning,
    message_format: "'{0}' hides inherited member '{1}'. To make the current member override that implementation, add the override keyword. Otherwise add the new keyword.",
    group: RuleGroup::Stable,
    fix: FixDescriptor::safe("Add 'override' or 'new' modifier"),
};

pub static HIDES_NON_VIRTUAL_MEMBER: LintDescriptor = LintDescriptor {
    id: "hides_non_virtual_member",
    title: "Member hides inherited member",
    category: LintCategory::Compiler,
    default_severity: Severity::Warning,
    message_format: "'{0}' hides inherited member '{1}'. Use the new keyword if hiding was intended.",
    group: RuleGroup::Stable,
    fix: FixDescriptor::safe("Add 'new' modifier"),
};

// ============================================================================
// Readability
// ============================================================================

pub static NESTED_CONDITIONAL_EXPRESSION: LintDescriptor = LintDescriptor {
    id: "nested_conditional_expression",
    title: "Avoid nested ?: operators",
    category: LintCategory::Readability,
    default_severity: Severity::Info,
    message_format: "Avoid nested ?: operators ({0} levels deep)",
    group: RuleGroup::Stable,
    fix: FixDescriptor::none(),
};

// ============================================================================
// Style
// ============================================================================

pub static MODIFIERS_ORDER: LintDescriptor = LintDescriptor {
    id: "modifiers_order",
    title: "Order modifiers conventionally",
    category: LintCategory::Style,
    default_severity: Severity::Info,
    message_format: "Modifiers should be ordered: `{0}`",
    group: RuleGroup::Preview,
    fix: FixDescriptor::none(),
};

static ALL: &[&LintDescriptor] = &[
    &HIDES_INHERITED_MEMBER,
    &HIDES_NON_VIRTUAL_MEMBER,
    &NESTED_CONDITIONAL_EXPRESSION,
    &MODIFIERS_ORDER,
];

/// Read-only lookup over the catalog. Iteration order is sorted by id.
#[derive(Debug)]
pub struct DescriptorRegistry {
    sorted: Vec<&'static LintDescriptor>,
}

impl DescriptorRegistry {
    pub fn new(descriptors: &[&'static LintDescriptor]) -> Self {
        let mut sorted = descriptors.to_vec();
        sorted.sort_by_key(|d| d.id);
        sorted.dedup_by_key(|d| d.id);
        Self { sorted }
    }

    pub fn builtin() -> Self {
        Self::new(ALL)
    }

    pub fn all(&self) -> impl Iterator<Item = &'static LintDescriptor> + '_ {
        self.sorted.iter().copied()
    }

    pub fn get(&self, id: &str) -> Option<&'static LintDescriptor> {
        self.sorted
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|idx| self.sorted[idx])
    }

    pub fn by_category(
        &self,
        category: LintCategory,
    ) -> impl Iterator<Item = &'static LintDescriptor> + '_ {
        self.all().filter(move |d| d.category == category)
    }

    pub fn is_known(&self, id_or_category: &str) -> bool {
        self.get(id_or_category).is_some()
            || self.all().any(|d| d.category.as_str() == id_or_category)
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Every built-in descriptor, in declaration order.
pub fn all_descriptors() -> &'static [&'static LintDescriptor] {
    ALL
}
