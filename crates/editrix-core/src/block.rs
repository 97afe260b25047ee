//! Block nodes: paragraphs and headings holding an ordered list of text runs.
//!
//! A block never contains other blocks and never has zero runs. Offsets handed to block
//! methods are *raw* character offsets into the concatenated run text, where an empty run
//! still counts as one character (its empty marker).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::render::{Attributes, CONTENT_EDITABLE_ATTRIBUTE, NODE_ID_ATTRIBUTE};
use crate::run::{TextRun, byte_offset};

/// Errors raised while constructing nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// The tag is not one of the block tags.
    #[error("invalid tag for block node: {0}")]
    InvalidBlockTag(String),
    /// The string is not a node id produced by this crate.
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),
}

/// Tag of a block node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockTag {
    /// `p`
    #[default]
    #[serde(rename = "p")]
    Paragraph,
    /// `h1`
    #[serde(rename = "h1")]
    Heading1,
    /// `h2`
    #[serde(rename = "h2")]
    Heading2,
    /// `h3`
    #[serde(rename = "h3")]
    Heading3,
}

impl BlockTag {
    /// All block tags.
    pub const ALL: [BlockTag; 4] = [
        BlockTag::Paragraph,
        BlockTag::Heading1,
        BlockTag::Heading2,
        BlockTag::Heading3,
    ];

    /// Element tag name.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Heading1 => "h1",
            BlockTag::Heading2 => "h2",
            BlockTag::Heading3 => "h3",
        }
    }

    /// Whether this is a heading level.
    pub fn is_heading(self) -> bool {
        !matches!(self, BlockTag::Paragraph)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockTag {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| NodeError::InvalidBlockTag(s.to_string()))
    }
}

/// Where a raw block offset lands among the runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLocation {
    /// Index of the run containing the offset.
    pub index: usize,
    /// Raw offset of the run's first character within the block.
    pub start: usize,
    /// Offset local to the run.
    pub local: usize,
}

/// A paragraph or heading.
#[derive(Debug, Clone)]
pub struct BlockNode {
    id: NodeId,
    tag: BlockTag,
    runs: Vec<TextRun>,
    attributes: Attributes,
    parent: NodeId,
}

impl BlockNode {
    /// Create a block owned by the container `parent`, holding one empty run.
    pub fn new(tag: BlockTag, parent: NodeId) -> Self {
        let id = NodeId::next();
        let mut attributes = Attributes::new();
        attributes.insert(NODE_ID_ATTRIBUTE.to_string(), id.to_string());
        attributes.insert(CONTENT_EDITABLE_ATTRIBUTE.to_string(), "true".to_string());
        Self {
            id,
            tag,
            runs: vec![TextRun::empty()],
            attributes,
            parent,
        }
    }

    /// Create a block from an element tag name, failing on anything but `p`/`h1`/`h2`/`h3`.
    pub fn with_tag_name(tag_name: &str, parent: NodeId) -> Result<Self, NodeError> {
        let tag = tag_name.parse()?;
        Ok(Self::new(tag, parent))
    }

    /// Block id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Block tag.
    pub fn tag(&self) -> BlockTag {
        self.tag
    }

    /// Change the block tag.
    pub fn set_tag(&mut self, tag: BlockTag) {
        self.tag = tag;
    }

    /// Owning container.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Rendering attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Set a rendering attribute. The identity attribute cannot be changed.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == NODE_ID_ATTRIBUTE {
            return;
        }
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Runs in order.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Mutable access to one run.
    pub fn run_mut(&mut self, index: usize) -> Option<&mut TextRun> {
        self.runs.get_mut(index)
    }

    /// Consume the block, yielding its runs.
    pub fn into_runs(self) -> Vec<TextRun> {
        self.runs
    }

    /// Logical text (empty markers removed).
    pub fn text_content(&self) -> String {
        self.runs.iter().map(TextRun::logical_text).collect()
    }

    /// Raw length in characters, counting each empty marker as one.
    pub fn raw_len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    /// Whether the block holds only its placeholder run.
    pub fn is_placeholder(&self) -> bool {
        self.runs.len() == 1 && self.runs[0].is_empty()
    }

    /// Find the run containing raw `offset`.
    ///
    /// An offset on a boundary between two runs resolves to the end of the earlier run.
    pub fn locate(&self, offset: usize) -> Option<RunLocation> {
        let mut start = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let len = run.len();
            if start + len >= offset {
                return Some(RunLocation {
                    index,
                    start,
                    local: offset - start,
                });
            }
            start += len;
        }
        None
    }

    /// Raw block offset of `local` inside run `index`, clamped to the block length.
    pub fn offset_of(&self, index: usize, local: usize) -> usize {
        let start: usize = self.runs.iter().take(index).map(TextRun::len).sum();
        (start + local).min(self.raw_len())
    }

    /// Truncate run `index` to `[0, offset)` and return the tail `[offset, end)` as a new run
    /// with the same bold flag. Returns `None` when the tail is logically empty or `index` is
    /// out of bounds. The caller decides where the tail goes.
    pub fn split_run_at_offset(&mut self, index: usize, offset: usize) -> Option<TextRun> {
        let run = self.runs.get_mut(index)?;
        let split = byte_offset(run.text(), offset);
        let tail = run.text()[split..].to_string();
        let head = run.text()[..split].to_string();
        run.set_text(&head);

        let tail = TextRun::new(&tail).with_bold(run.is_bold());
        if tail.is_empty() { None } else { Some(tail) }
    }

    /// Append run `second`'s text to run `first` and remove `second`.
    ///
    /// Callers must only pass adjacent runs (`second == first + 1`) to keep document order.
    pub fn merge_runs(&mut self, first: usize, second: usize) -> bool {
        if first == second || first >= self.runs.len() || second >= self.runs.len() {
            return false;
        }
        let absorbed = self.runs.remove(second);
        let first = if second < first { first - 1 } else { first };
        let run = &mut self.runs[first];
        let merged = format!("{}{}", run.text(), absorbed.text());
        run.set_text(&merged);
        true
    }

    /// Insert `run` at `index` (clamped to the end).
    pub fn insert_run(&mut self, run: TextRun, index: usize) {
        let index = index.min(self.runs.len());
        self.runs.insert(index, run);
    }

    /// Remove run `index`, unless it is the last remaining run.
    pub fn remove_run(&mut self, index: usize) -> Option<TextRun> {
        if self.runs.len() <= 1 || index >= self.runs.len() {
            return None;
        }
        Some(self.runs.remove(index))
    }

    /// Detach every run from `index` on.
    ///
    /// If nothing would remain, a fresh placeholder run is left behind.
    pub fn remove_runs_from(&mut self, index: usize) -> Vec<TextRun> {
        if index >= self.runs.len() {
            return Vec::new();
        }
        let removed = self.runs.split_off(index);
        if self.runs.is_empty() {
            self.runs.push(TextRun::empty());
        }
        removed
    }

    /// Insert `runs` starting at `index`.
    ///
    /// When the block holds only its placeholder run, the placeholder is dropped first so merged
    /// content does not drag an empty run along.
    pub fn insert_runs_at(&mut self, runs: Vec<TextRun>, index: usize) {
        if runs.is_empty() {
            return;
        }
        let mut index = index;
        if self.is_placeholder() {
            self.runs.clear();
            index = 0;
        }
        let index = index.min(self.runs.len());
        self.runs.splice(index..index, runs);
    }
}
