//! Text edit primitives.
//!
//! All offsets are UTF-8 byte offsets into the original, unmodified source text.

use std::fmt;

use thiserror::Error;

/// A half-open text range `[start, end)` in UTF-8 byte offsets.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid range: {start}..{end}");
        Self { start, end }
    }

    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether the two ranges cannot be edited independently.
    ///
    /// Ranges that only touch do not overlap, except two inserts at the same offset.
    pub fn overlaps(self, other: TextRange) -> bool {
        (self.start < other.end && other.start < self.end) || (self.is_empty() && self == other)
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A single replacement of `range` by `replacement`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {len}")]
    RangeOutOfBounds { range: TextRange, len: usize },
    #[error("offset {offset} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: usize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Sort edits by `(start, end)` and check bounds and overlaps.
///
/// Two inserts at the same offset count as overlapping since their relative order
/// would be ambiguous. Edits that touch end-to-start are coalesced into one.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    for edit in edits.iter() {
        if edit.range.end > text.len() {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                len: text.len(),
            });
        }
        for offset in [edit.range.start, edit.range.end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let (first, second) = (pair[0].range, pair[1].range);
        if first.end > second.start || (first.is_empty() && second.is_empty() && first == second)
        {
            return Err(EditError::OverlappingEdits { first, second });
        }
    }

    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end == edit.range.start {
                last.range = TextRange::new(last.range.start, edit.range.end);
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }
    *edits = merged;

    Ok(())
}

/// Apply `edits` to `text` and return the rewritten text.
///
/// Edits are normalized first, then spliced from the end of the text backwards so
/// earlier offsets stay valid.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        out.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }
    Ok(out)
}
