//! Text edits and fix candidates.
//!
//! Fixes never rewrite a document wholesale. A [`FixCandidate`] carries the
//! minimal set of byte-range edits that resolve one diagnostic; applying it
//! yields a new [`Document`] and leaves the original untouched.
//!
//! ## Guarantees
//!
//! - Edits are validated to be in bounds and non-overlapping before application
//! - Edits are applied back to front so earlier offsets stay valid
//! - A result that parses worse than its input is rejected

use thiserror::Error;

use crate::diagnostics::SourceSpan;
use crate::error::ClippyResult;
use crate::parser::Document;

#[derive(Debug, Error)]
pub enum FixError {
    #[error("overlapping edits at byte {0}")]
    OverlappingEdits(usize),

    #[error("edit range [{start}..{end}) exceeds source length {source_len}")]
    InvalidRange {
        start: usize,
        end: usize,
        source_len: usize,
    },

    #[error("edit start {start} is after edit end {end}")]
    InvalidEditOrder { start: usize, end: usize },

    #[error("edit range [{start}..{end}) splits a UTF-8 character")]
    NotCharBoundary { start: usize, end: usize },

    /// The edited text has more syntax errors than the original.
    #[error("fix produced malformed source ({before} -> {after} syntax errors)")]
    MalformedResult { before: usize, after: usize },
}

/// Replace the bytes `[start_byte..end_byte)` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }

    pub fn insert(byte_offset: usize, text: impl Into<String>) -> Self {
        Self::new(byte_offset, byte_offset, text)
    }

    pub fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self::new(start_byte, end_byte, String::new())
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_byte..self.end_byte
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::from_bounds(self.start_byte, self.end_byte.max(self.start_byte))
    }

    /// `[a, b)` and `[c, d)` overlap when `a < d && c < b`. Two insertions at
    /// the same offset also conflict, since their relative order is undefined.
    pub fn overlaps_with(&self, other: &TextEdit) -> bool {
        let both_inserts = self.start_byte == self.end_byte && other.start_byte == other.end_byte;
        if both_inserts {
            return self.start_byte == other.start_byte;
        }
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }

    pub fn validate(&self, source: &str) -> Result<(), FixError> {
        if self.start_byte > self.end_byte {
            return Err(FixError::InvalidEditOrder {
                start: self.start_byte,
                end: self.end_byte,
            });
        }
        if self.end_byte > source.len() {
            return Err(FixError::InvalidRange {
                start: self.start_byte,
                end: self.end_byte,
                source_len: source.len(),
            });
        }
        if !source.is_char_boundary(self.start_byte) || !source.is_char_boundary(self.end_byte) {
            return Err(FixError::NotCharBoundary {
                start: self.start_byte,
                end: self.end_byte,
            });
        }
        Ok(())
    }
}

/// Check every edit is in bounds and no two overlap.
pub fn validate_edits(edits: &[TextEdit], source: &str) -> Result<(), FixError> {
    for edit in edits {
        edit.validate(source)?;
    }

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start_byte, e.end_byte));
    for pair in sorted.windows(2) {
        if pair[0].overlaps_with(pair[1]) {
            return Err(FixError::OverlappingEdits(pair[1].start_byte));
        }
    }

    Ok(())
}

/// Apply non-overlapping edits to `source`, in any input order.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, FixError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    validate_edits(edits, source)?;

    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));

    let mut result = source.to_string();
    for edit in sorted {
        result.replace_range(edit.range(), &edit.replacement);
    }

    Ok(result)
}

/// Re-parse `text` as a successor of `document`, rejecting it when it has
/// more syntax errors than the original.
pub(crate) fn reparse_checked(document: &Document, text: String) -> ClippyResult<Document> {
    let before = document.error_count();
    let fixed = document.with_source(text)?;
    let after = fixed.error_count();
    if after > before {
        return Err(FixError::MalformedResult { before, after }.into());
    }
    Ok(fixed)
}

/// `"{lint}.{variant}"`: identifies interchangeable candidates across
/// diagnostics of the same rule.
pub fn equivalence_key(lint: &str, variant: &str) -> String {
    format!("{lint}.{variant}")
}

/// One offered correction for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixCandidate {
    pub title: String,
    pub equivalence_key: String,
    pub lint: &'static str,
    /// Settings key that toggles this kind of fix.
    pub variant: &'static str,
    pub edits: Vec<TextEdit>,
}

impl FixCandidate {
    pub fn new(
        title: impl Into<String>,
        lint: &'static str,
        variant: &'static str,
        edits: Vec<TextEdit>,
    ) -> Self {
        Self {
            title: title.into(),
            equivalence_key: equivalence_key(lint, variant),
            lint,
            variant,
            edits,
        }
    }

    /// Produce the fixed document. `document` is not modified.
    ///
    /// # Errors
    ///
    /// Fails when the edits do not fit the document or the result no longer
    /// parses as well as the input.
    pub fn apply(&self, document: &Document) -> ClippyResult<Document> {
        let text = apply_edits(document.source(), &self.edits)?;
        reparse_checked(document, text)
    }

    /// Smallest span of the original text the edits touch.
    pub fn changed_span(&self) -> Option<SourceSpan> {
        let start = self.edits.iter().map(|e| e.start_byte).min()?;
        let end = self.edits.iter().map(|e| e.end_byte).max()?;
        Some(SourceSpan::from_bounds(start, end))
    }
}
