//! Text runs: the smallest styled span of text inside a block.

use crate::id::NodeId;

/// Zero-width placeholder that keeps a logically empty run renderable (and caret-addressable).
pub const EMPTY_MARKER: char = '\u{200B}';

/// A contiguous span of text sharing one style.
///
/// The stored text is never the empty string: an empty run holds exactly [`EMPTY_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    id: NodeId,
    text: String,
    bold: bool,
}

impl TextRun {
    /// Create a plain run holding `text` (normalized, see [`TextRun::set_text`]).
    pub fn new(text: &str) -> Self {
        Self {
            id: NodeId::next(),
            text: normalize(text),
            bold: false,
        }
    }

    /// Create an empty run (holding only the empty marker).
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create an empty bold run.
    pub fn empty_bold() -> Self {
        Self::empty().with_bold(true)
    }

    /// Builder-style bold setter.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Run id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Raw stored text (may be the empty marker).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text without the empty marker.
    pub fn logical_text(&self) -> &str {
        if self.is_empty() { "" } else { &self.text }
    }

    /// Replace the text.
    ///
    /// Empty markers at either end of `text` are trimmed; an empty result is stored as the
    /// empty marker. Applying this to already-normalized text is a no-op.
    pub fn set_text(&mut self, text: &str) {
        self.text = normalize(text);
    }

    /// Whether this run is logically empty.
    pub fn is_empty(&self) -> bool {
        is_marker_only(&self.text)
    }

    /// Raw length in characters (the empty marker counts as one).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Bold flag.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Set the bold flag.
    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    /// Delete the character immediately before `char_offset`. Returns `false` when there is none.
    pub(crate) fn delete_char_before(&mut self, char_offset: usize) -> bool {
        if char_offset == 0 || char_offset > self.len() {
            return false;
        }
        let start = byte_offset(&self.text, char_offset - 1);
        let end = byte_offset(&self.text, char_offset);
        let mut next = String::with_capacity(self.text.len());
        next.push_str(&self.text[..start]);
        next.push_str(&self.text[end..]);
        self.set_text(&next);
        true
    }
}

fn is_marker_only(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(EMPTY_MARKER) && chars.next().is_none()
}

fn normalize(text: &str) -> String {
    let trimmed = text.trim_matches(EMPTY_MARKER);
    if trimmed.is_empty() {
        EMPTY_MARKER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Byte index of the `char_offset`-th character (or `text.len()` past the end).
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
