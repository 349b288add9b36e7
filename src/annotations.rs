//! Inline suppression directives.
//!
//! Recognized forms, one per line:
//!
//! - `#pragma warning disable id1, id2` - stop reporting the listed lints
//! - `#pragma warning restore id1` - resume reporting
//!
//! A directive without ids applies to every lint. A directive takes effect at
//! the start of its own line and lasts until a matching `restore`. Lines that
//! sit inside a comment or a string literal are text, not directives.

use tree_sitter::Node;

use crate::parser::Document;

/// Node kinds whose contents never hold live directives.
const TEXT_KINDS: &[&str] = &[
    "comment",
    "string_literal",
    "verbatim_string_literal",
    "raw_string_literal",
    "interpolated_string_expression",
];

/// Whether a directive turns reporting off or back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PragmaAction {
    Disable,
    Restore,
}

/// One `#pragma warning` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaDirective {
    /// Byte offset of the start of the directive's line.
    pub offset: usize,
    pub action: PragmaAction,
    /// Lint ids named by the directive; empty means all lints.
    pub ids: Vec<String>,
}

impl PragmaDirective {
    fn applies_to(&self, lint_id: &str) -> bool {
        self.ids.is_empty() || self.ids.iter().any(|id| id == lint_id)
    }
}

/// All pragma directives of one document, in source order.
#[derive(Debug, Clone, Default)]
pub struct PragmaDirectives {
    directives: Vec<PragmaDirective>,
}

impl PragmaDirectives {
    pub fn parse(source: &str) -> Self {
        let mut directives = Vec::new();
        let mut offset = 0usize;

        for line in source.split_inclusive('\n') {
            if let Some((action, ids)) = parse_pragma_line(line) {
                directives.push(PragmaDirective {
                    offset,
                    action,
                    ids,
                });
            }
            offset += line.len();
        }

        Self { directives }
    }

    /// Directives of a parsed document, minus lookalikes quoted in comments
    /// and string literals.
    pub fn from_document(document: &Document) -> Self {
        let source = document.source();
        let root = document.root();
        let mut pragmas = Self::parse(source);
        pragmas.directives.retain(|d| {
            let hash = source[d.offset..].find('#').map_or(d.offset, |i| d.offset + i);
            !inside_text(root, hash)
        });
        pragmas
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn directives(&self) -> &[PragmaDirective] {
        &self.directives
    }

    /// True when `lint_id` is disabled at byte `offset`.
    pub fn is_disabled_at(&self, lint_id: &str, offset: usize) -> bool {
        self.directives
            .iter()
            .take_while(|d| d.offset <= offset)
            .filter(|d| d.applies_to(lint_id))
            .last()
            .is_some_and(|d| d.action == PragmaAction::Disable)
    }
}

fn inside_text(root: Node<'_>, offset: usize) -> bool {
    let mut current = root.descendant_for_byte_range(offset, offset + 1);
    while let Some(node) = current {
        if TEXT_KINDS.contains(&node.kind()) {
            return true;
        }
        current = node.parent();
    }
    false
}

fn parse_pragma_line(line: &str) -> Option<(PragmaAction, Vec<String>)> {
    let rest = line.trim().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("pragma")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix("warning")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();

    let (action, rest) = if let Some(rest) = rest.strip_prefix("disable") {
        (PragmaAction::Disable, rest)
    } else if let Some(rest) = rest.strip_prefix("restore") {
        (PragmaAction::Restore, rest)
    } else {
        return None;
    };

    // Trailing `// comment` is allowed after the id list.
    let rest = rest.split("//").next().unwrap_or_default();
    let ids = rest
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    Some((action, ids))
}
