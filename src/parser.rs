use anyhow::{Context, Result};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{ClippyError, ClippyResult};

fn csharp_language() -> Language {
    tree_sitter_c_sharp::language()
}

pub fn parse_source(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(csharp_language())
        .context("failed to load C# grammar")?;

    parser
        .parse(source, None)
        .context("tree-sitter failed to parse source")
}

/// One parsed source unit: file name, text and syntax tree.
///
/// Documents are never edited in place; fixes produce a new `Document`.
pub struct Document {
    file: Option<String>,
    source: String,
    tree: Tree,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> ClippyResult<Self> {
        Self::build(None, source.into())
    }

    pub fn parse_named(file: impl Into<String>, source: impl Into<String>) -> ClippyResult<Self> {
        Self::build(Some(file.into()), source.into())
    }

    fn build(file: Option<String>, source: String) -> ClippyResult<Self> {
        let tree = parse_source(&source).map_err(|e| ClippyError::parse(format!("{e:#}")))?;
        Ok(Self { file, source, tree })
    }

    /// A new document for the same file with different text.
    pub fn with_source(&self, source: String) -> ClippyResult<Self> {
        Self::build(self.file.clone(), source)
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Number of `ERROR` and missing nodes in the tree.
    pub fn error_count(&self) -> usize {
        let mut count = 0;
        crate::syntax::walk(self.root(), &mut |node| {
            if node.is_error() || node.is_missing() {
                count += 1;
            }
        });
        count
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file)
            .field("len", &self.source.len())
            .finish()
    }
}
