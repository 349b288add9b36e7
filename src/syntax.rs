//! Syntax helpers over the tree-sitter C# tree.
//!
//! [`SyntaxElement`] folds the three element categories detectors look at
//! (nodes, tokens, trivia) into one type whose [`SyntaxElement::span`] is the
//! single way spans are derived for reporting.

use tree_sitter::Node;

use crate::diagnostics::SourceSpan;

pub const CONDITIONAL_EXPRESSION: &str = "conditional_expression";
pub const PARENTHESIZED_EXPRESSION: &str = "parenthesized_expression";
pub const CLASS_DECLARATION: &str = "class_declaration";
pub const MODIFIER: &str = "modifier";
pub const COMMENT: &str = "comment";
pub const WHITESPACE: &str = "whitespace";

pub const MEMBER_DECLARATIONS: &[&str] = &[
    "method_declaration",
    "property_declaration",
    "event_declaration",
    "indexer_declaration",
    "field_declaration",
    "event_field_declaration",
];

/// Kind of trivia attached around tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Comment,
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: SourceSpan,
}

/// A node, token or piece of trivia handed to a detector.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxElement<'tree> {
    /// Named, non-trivia syntax node.
    Node(Node<'tree>),
    /// Anonymous leaf such as a keyword or punctuation.
    Token(Node<'tree>),
    Trivia(Trivia),
}

impl<'tree> SyntaxElement<'tree> {
    /// Classify a tree-sitter node.
    pub fn from_node(node: Node<'tree>) -> Self {
        if node.kind() == COMMENT {
            SyntaxElement::Trivia(Trivia {
                kind: TriviaKind::Comment,
                span: node_span(node),
            })
        } else if node.is_named() {
            SyntaxElement::Node(node)
        } else {
            SyntaxElement::Token(node)
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxElement::Node(node) | SyntaxElement::Token(node) => node_span(*node),
            SyntaxElement::Trivia(trivia) => trivia.span,
        }
    }

    /// Kind string used for detector dispatch.
    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxElement::Node(node) | SyntaxElement::Token(node) => node.kind(),
            SyntaxElement::Trivia(trivia) => match trivia.kind {
                TriviaKind::Comment => COMMENT,
                TriviaKind::Whitespace => WHITESPACE,
            },
        }
    }

    pub fn as_node(&self) -> Option<Node<'tree>> {
        match self {
            SyntaxElement::Node(node) => Some(*node),
            _ => None,
        }
    }
}

pub fn node_span(node: Node) -> SourceSpan {
    SourceSpan::from_bounds(node.start_byte(), node.end_byte())
}

pub fn slice<'a>(source: &'a str, node: Node) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

pub fn walk<'tree>(node: Node<'tree>, f: &mut impl FnMut(Node<'tree>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, f);
    }
}

/// First node of `kind` in a preorder walk of `node` (inclusive).
pub fn first_descendant<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|child| first_descendant(child, kind))
}

/// Whitespace runs between `start` and `end` (e.g. between two tokens).
pub fn whitespace_between(source: &str, start: usize, end: usize) -> Option<Trivia> {
    let text = source.get(start..end)?;
    if text.is_empty() || !text.chars().all(char::is_whitespace) {
        return None;
    }
    Some(Trivia {
        kind: TriviaKind::Whitespace,
        span: SourceSpan::from_bounds(start, end),
    })
}

/// Named children that are not comments.
pub fn operands<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != COMMENT)
        .collect()
}

/// Outermost parenthesized expression wrapping `node`, or `node` itself.
pub fn walk_up_parentheses(node: Node) -> Node {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() != PARENTHESIZED_EXPRESSION {
            break;
        }
        current = parent;
    }
    current
}

/// Innermost expression inside any number of parentheses.
pub fn walk_down_parentheses(node: Node) -> Node {
    let mut current = node;
    while current.kind() == PARENTHESIZED_EXPRESSION {
        match operands(current).first() {
            Some(inner) => current = *inner,
            None => break,
        }
    }
    current
}

pub fn is_member_declaration(kind: &str) -> bool {
    MEMBER_DECLARATIONS.contains(&kind)
}

/// Nearest member declaration containing `node` (inclusive).
pub fn enclosing_member_declaration(node: Node) -> Option<Node> {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_member_declaration(n.kind()) {
            return Some(n);
        }
        if n.kind() == CLASS_DECLARATION {
            return None;
        }
        current = n.parent();
    }
    None
}

/// Smallest node covering `span`.
pub fn covering_node(root: Node, span: SourceSpan) -> Option<Node> {
    if span.end() > root.end_byte() {
        return None;
    }
    root.descendant_for_byte_range(span.start, span.end())
}

/// Modifier nodes of a declaration, in source order.
pub fn modifiers<'tree>(declaration: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = declaration.walk();
    declaration
        .children(&mut cursor)
        .filter(|child| child.kind() == MODIFIER)
        .collect()
}

pub fn modifier_keywords<'a>(source: &'a str, declaration: Node) -> Vec<&'a str> {
    modifiers(declaration)
        .into_iter()
        .map(|m| slice(source, m).trim())
        .collect()
}

/// The identifier naming a type or member declaration.
pub fn declaration_name(declaration: Node) -> Option<Node> {
    if let Some(name) = declaration.child_by_field_name("name") {
        return Some(name);
    }

    let mut cursor = declaration.walk();
    let mut last_identifier = None;
    for child in declaration.children(&mut cursor) {
        match child.kind() {
            "identifier" => last_identifier = Some(child),
            "parameter_list" | "type_parameter_list" | "accessor_list"
            | "arrow_expression_clause" | "base_list" | "declaration_list" | "block" | "=" => {
                break;
            }
            _ => {}
        }
    }
    last_identifier
}

/// First child that may carry modifiers in front of it: skips attributes and comments.
pub fn first_non_attribute_child(declaration: Node) -> Option<Node> {
    let mut cursor = declaration.walk();
    declaration
        .children(&mut cursor)
        .find(|child| child.kind() != "attribute_list" && child.kind() != COMMENT)
}

/// Rightmost simple identifier of a type reference (`Base`, `Base<T>`, `Ns.Base`).
pub fn simple_type_name<'a>(source: &'a str, type_node: Node) -> Option<&'a str> {
    match type_node.kind() {
        "identifier" => Some(slice(source, type_node)),
        "generic_name" => {
            let mut cursor = type_node.walk();
            let ident = type_node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier")?;
            Some(slice(source, ident))
        }
        "qualified_name" | "alias_qualified_name" => {
            let last = operands(type_node).into_iter().last()?;
            simple_type_name(source, last)
        }
        _ => None,
    }
}
