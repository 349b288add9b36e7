//! A minimal semantic unit over one document: class types, their declared
//! base class and their members.
//!
//! Only what the symbol-level detectors need is modelled. Base classes are
//! resolved by simple name within the same document.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::diagnostics::SourceSpan;
use crate::parser::Document;
use crate::syntax::{
    CLASS_DECLARATION, declaration_name, first_descendant, modifier_keywords, node_span,
    simple_type_name, slice, walk,
};

const ACCESSIBILITY: &[&str] = &["public", "protected", "internal", "private", "file"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method { arity: usize },
    Property,
}

/// A member declared directly in a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSymbol {
    pub name: String,
    pub kind: MemberKind,
    pub modifiers: Vec<String>,
    pub name_span: SourceSpan,
    pub declaration_span: SourceSpan,
    /// Index of the containing type in [`Compilation::types`].
    pub containing_type: usize,
}

impl MemberSymbol {
    pub fn has_modifier(&self, keyword: &str) -> bool {
        self.modifiers.iter().any(|m| m == keyword)
    }

    /// `virtual`, `abstract` and `override` members can be overridden, unless
    /// they are also `sealed`.
    pub fn is_overridable(&self) -> bool {
        !self.has_modifier("sealed")
            && ["virtual", "abstract", "override"]
                .iter()
                .any(|k| self.has_modifier(k))
    }

    /// Class members default to private when no accessibility is written.
    pub fn is_private(&self) -> bool {
        let explicit = self
            .modifiers
            .iter()
            .find(|m| ACCESSIBILITY.contains(&m.as_str()));
        match explicit {
            Some(m) => m == "private" && !self.has_modifier("protected"),
            None => true,
        }
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static")
    }

    pub fn same_signature(&self, other: &MemberSymbol) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

/// A class declared in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    pub base: Option<String>,
    pub span: SourceSpan,
    pub members: Vec<MemberSymbol>,
}

#[derive(Debug, Clone, Default)]
pub struct Compilation {
    types: Vec<TypeSymbol>,
}

impl Compilation {
    pub fn from_document(document: &Document) -> Self {
        let source = document.source();
        let mut types = Vec::new();

        walk(document.root(), &mut |node| {
            if node.kind() == CLASS_DECLARATION
                && let Some(ty) = collect_type(source, node, types.len())
            {
                types.push(ty);
            }
        });

        Self { types }
    }

    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    pub fn type_named(&self, name: &str) -> Option<(usize, &TypeSymbol)> {
        self.types.iter().enumerate().find(|(_, t)| t.name == name)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberSymbol> {
        self.types.iter().flat_map(|t| t.members.iter())
    }

    pub fn containing_type(&self, member: &MemberSymbol) -> &TypeSymbol {
        &self.types[member.containing_type]
    }

    /// Base classes of `type_index`, nearest first. Stops at unresolved names
    /// and at inheritance cycles.
    pub fn base_chain(&self, type_index: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([type_index]);
        let mut current = type_index;

        while let Some(base) = self.types[current].base.as_deref() {
            let Some((idx, _)) = self.type_named(base) else {
                break;
            };
            if !seen.insert(idx) {
                break;
            }
            chain.push(idx);
            current = idx;
        }

        chain
    }

    /// The nearest non-private base member `member` hides, if any.
    pub fn hidden_base_member(&self, member: &MemberSymbol) -> Option<&MemberSymbol> {
        self.base_chain(member.containing_type)
            .into_iter()
            .flat_map(|idx| self.types[idx].members.iter())
            .find(|base| !base.is_private() && base.same_signature(member))
    }

    /// `Type.Member` or `Type.Method()` as shown in messages.
    pub fn display_name(&self, member: &MemberSymbol) -> String {
        let owner = &self.containing_type(member).name;
        match member.kind {
            MemberKind::Method { .. } => format!("{owner}.{}()", member.name),
            MemberKind::Property => format!("{owner}.{}", member.name),
        }
    }
}

fn collect_type(source: &str, class: Node, index: usize) -> Option<TypeSymbol> {
    let name = slice(source, declaration_name(class)?).to_string();

    let mut cursor = class.walk();
    let children: Vec<Node> = class.children(&mut cursor).collect();

    let base = children
        .iter()
        .find(|c| c.kind() == "base_list")
        .and_then(|list| {
            let mut cursor = list.walk();
            let first = list.named_children(&mut cursor).next()?;
            simple_type_name(source, first)
                .or_else(|| first_descendant(first, "identifier").map(|id| slice(source, id)))
                .map(str::to_string)
        });

    let members: Vec<MemberSymbol> = children
        .iter()
        .find(|c| c.kind() == "declaration_list")
        .map(|body| {
            let mut cursor = body.walk();
            body.named_children(&mut cursor)
                .filter_map(|decl| collect_member(source, decl, index))
                .collect()
        })
        .unwrap_or_default();

    Some(TypeSymbol {
        name,
        base,
        span: node_span(class),
        members,
    })
}

fn collect_member(source: &str, decl: Node, containing_type: usize) -> Option<MemberSymbol> {
    let kind = match decl.kind() {
        "method_declaration" => MemberKind::Method {
            arity: parameter_count(decl),
        },
        "property_declaration" => MemberKind::Property,
        _ => return None,
    };
    let name = declaration_name(decl)?;

    Some(MemberSymbol {
        name: slice(source, name).to_string(),
        kind,
        modifiers: modifier_keywords(source, decl)
            .into_iter()
            .map(str::to_string)
            .collect(),
        name_span: node_span(name),
        declaration_span: node_span(decl),
        containing_type,
    })
}

fn parameter_count(method: Node) -> usize {
    let mut cursor = method.walk();
    let Some(list) = method
        .children(&mut cursor)
        .find(|c| c.kind() == "parameter_list")
    else {
        return 0;
    };
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|p| p.kind() == "parameter")
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = r#"
class Base {
    public virtual void Foo() { }
    void Hidden() { }
    public int Count { get; set; }
}

class Derived : Base {
    public void Foo() { }
    public void Foo(int x) { }
    public void Hidden() { }
    public new int Count { get; set; }
}
"#;

    #[test]
    fn collects_types_bases_and_members() {
        let doc = Document::parse(SRC).unwrap();
        let compilation = Compilation::from_document(&doc);
        let types = compilation.types();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].name, "Base");
        assert_eq!(types[0].base, None);
        assert_eq!(types[1].name, "Derived");
        assert_eq!(types[1].base.as_deref(), Some("Base"));
        assert_eq!(types[1].members.len(), 4);
        assert_eq!(types[1].members[1].kind, MemberKind::Method { arity: 1 });
        assert_eq!(&SRC[types[1].members[0].name_span.range()], "Foo");
    }

    #[test]
    fn finds_hidden_members() {
        let doc = Document::parse(SRC).unwrap();
        let compilation = Compilation::from_document(&doc);
        let derived = &compilation.types()[1];

        let foo = &derived.members[0];
        let hidden = compilation.hidden_base_member(foo).expect("Foo hides Base.Foo");
        assert!(hidden.is_overridable());
        assert_eq!(compilation.display_name(hidden), "Base.Foo()");

        // Different arity is an overload, not hiding.
        assert!(compilation.hidden_base_member(&derived.members[1]).is_none());
        // Private base members are not inherited-visible.
        assert!(compilation.hidden_base_member(&derived.members[2]).is_none());
        // Properties resolve too; `new` is the detector's business.
        assert!(compilation.hidden_base_member(&derived.members[3]).is_some());
    }

    #[test]
    fn sealed_override_is_not_overridable() {
        let src = "class A { public virtual void M() { } }\nclass B : A { public sealed override void M() { } }\nclass C : B { public void M() { } }\n";
        let doc = Document::parse(src).unwrap();
        let compilation = Compilation::from_document(&doc);
        let c = &compilation.types()[2].members[0];

        let hidden = compilation.hidden_base_member(c).expect("C.M hides B.M");
        assert_eq!(compilation.display_name(hidden), "B.M()");
        assert!(!hidden.is_overridable());
        assert!(compilation.types()[0].members[0].is_overridable());
    }

    #[test]
    fn base_chain_survives_cycles() {
        let doc = Document::parse("class A : B { } class B : A { }").unwrap();
        let compilation = Compilation::from_document(&doc);
        assert_eq!(compilation.base_chain(0), vec![1]);
    }
}
