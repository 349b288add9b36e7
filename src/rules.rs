pub mod compiler;
pub mod readability;
pub mod style;

use crate::lint::LintRegistry;

// Compiler-style lints
pub use compiler::HiddenMemberLint;

// Readability lints
pub use readability::NestedConditionalLint;

// Style lints
pub use style::ModifiersOrderLint;

/// Every built-in rule, in a fixed order.
pub fn builtin_registry() -> LintRegistry {
    LintRegistry::new()
        .with_rule(HiddenMemberLint)
        .with_rule(NestedConditionalLint)
        .with_rule(ModifiersOrderLint)
}
