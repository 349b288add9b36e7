use std::collections::BTreeMap;

use serde::Serialize;

use crate::level::Severity;
use crate::lint::LintDescriptor;

/// Byte range inside one document: `start` plus `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourceSpan {
    pub start: usize,
    pub len: usize,
}

impl SourceSpan {
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Span covering `[start, end)`. Panics when `end < start`.
    #[must_use]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        assert!(end >= start, "span end {end} precedes start {start}");
        Self {
            start,
            len: end - start,
        }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end()
    }

    pub fn contains_span(&self, other: SourceSpan) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }
}

/// Single position in a source file (1-based line/column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Precomputed line starts for one document.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Resolve a byte offset to a 1-based position. Columns count bytes.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

/// A span resolved against its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: Option<String>,
    pub span: SourceSpan,
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn resolve(file: Option<String>, span: SourceSpan, index: &LineIndex) -> Self {
        Self {
            file,
            start: index.position(span.start),
            end: index.position(span.end()),
            span,
        }
    }
}

/// A single finding produced by a detector.
///
/// Built only by the reporting gateway in [`crate::lint::LintContext`], after
/// the suppression check passed.
#[derive(Debug, Clone)]
#[must_use]
pub struct Diagnostic {
    pub lint: &'static LintDescriptor,
    pub severity: Severity,
    pub location: Location,
    pub additional_locations: Vec<Location>,
    pub message_args: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub message: String,
}

impl Diagnostic {
    pub fn id(&self) -> &'static str {
        self.lint.id
    }

    pub fn span(&self) -> SourceSpan {
        self.location.span
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Flatten into the record handed to the host.
    pub fn to_record(&self) -> DiagnosticRecord<'_> {
        DiagnosticRecord {
            id: self.lint.id,
            category: self.lint.category.as_str(),
            severity: self.severity,
            message: &self.message,
            location: &self.location,
            additional_locations: &self.additional_locations,
            properties: &self.properties,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_record())
    }
}

/// Serializable view of a [`Diagnostic`].
#[derive(Debug, Serialize)]
pub struct DiagnosticRecord<'a> {
    pub id: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub message: &'a str,
    pub location: &'a Location,
    pub additional_locations: &'a [Location],
    pub properties: &'a BTreeMap<String, String>,
}

/// Substitute `{0}`, `{1}`, ... in `template` with `args`.
///
/// `{{` and `}}` produce literal braces. Placeholders without a matching
/// argument are left as written.
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find(['{', '}']) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{')
            && let Some(close) = tail.find('}')
            && let Ok(n) = tail[1..close].parse::<usize>()
            && let Some(arg) = args.get(n)
        {
            out.push_str(arg);
            rest = &tail[close + 1..];
            continue;
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}
