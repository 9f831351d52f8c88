use crate::edit::TextRange;

/// Immutable view of the file being rewritten.
///
/// Every matching and composition step receives this explicitly; nothing in the
/// crate keeps a global position index.
#[derive(Clone, Copy, Debug)]
pub struct SourceText<'a> {
    text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Returns the text covered by `range`, or `None` if the range does not lie on
    /// character boundaries inside the text.
    pub fn get(&self, range: TextRange) -> Option<&'a str> {
        self.text.get(range.start..range.end)
    }

    /// Like [`SourceText::get`], but falls back to an empty string.
    ///
    /// Host ranges are trusted; a bad range only degrades the rewrite of that node.
    pub fn slice(&self, range: TextRange) -> &'a str {
        match self.get(range) {
            Some(text) => text,
            None => {
                tracing::debug!(
                    target = "nova.rewrite",
                    ?range,
                    len = self.text.len(),
                    "source range does not fit the text"
                );
                ""
            }
        }
    }
}
