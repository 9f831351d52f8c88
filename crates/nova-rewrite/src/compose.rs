//! Splicing sub-edits into replacement text.

use crate::edit::{normalize_text_edits, EditError, TextEdit, TextRange};
use crate::source::SourceText;

/// Folds `edits` (all inside `range`) into one replacement string for `range`.
///
/// Text between edits is copied verbatim from `source`, so whitespace and comments
/// around the rewritten parts survive untouched. Returns `None` when there is nothing
/// to compose.
///
/// # Panics
///
/// Edits must lie inside `range` and must not overlap. Violations indicate a broken
/// rule, not bad input.
pub fn compose(source: &SourceText<'_>, range: TextRange, mut edits: Vec<TextEdit>) -> Option<String> {
    if edits.is_empty() {
        return None;
    }
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out = String::with_capacity(range.len());
    let mut cursor = range.start;
    for edit in &edits {
        assert!(
            range.contains_range(edit.range),
            "sub-edit {:?} escapes expression {range:?}",
            edit.range
        );
        assert!(
            cursor <= edit.range.start,
            "sub-edit {:?} overlaps the previous one ending at {cursor}",
            edit.range
        );
        out.push_str(source.slice(TextRange::new(cursor, edit.range.start)));
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(source.slice(TextRange::new(cursor, range.end)));
    Some(out)
}

/// Accumulates the fixes of every call site in one file.
#[derive(Clone, Debug, Default)]
pub struct FixList {
    edits: Vec<TextEdit>,
}

impl FixList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the fixes of one call site as a unit.
    ///
    /// If any of them overlaps a fix already in the list, nothing is added and the
    /// range of the accepted fix it collides with is returned.
    pub fn try_extend(&mut self, edits: Vec<TextEdit>) -> Result<(), TextRange> {
        for edit in &edits {
            if let Some(accepted) = self.edits.iter().find(|a| a.range.overlaps(edit.range)) {
                return Err(accepted.range);
            }
        }
        self.edits.extend(edits);
        Ok(())
    }

    /// Sorts the fixes by start offset and checks that they can be spliced into
    /// `source` together.
    pub fn finish(mut self, source: &SourceText<'_>) -> Result<Vec<TextEdit>, EditError> {
        normalize_text_edits(source.as_str(), &mut self.edits)?;
        Ok(self.edits)
    }
}
