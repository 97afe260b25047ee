//! In-memory surface.
//!
//! [`HeadlessSurface`] is a small element/text tree standing in for a browser document. It
//! implements both [`Renderer`] (the editor paints into it) and [`Surface`] (the caret manager
//! navigates and hit-tests it), sharing one tree through a cloned handle.
//!
//! Geometry is a text grid: every block element under the mounted root is one row, columns are
//! Unicode cell widths, and the line height is one row. The empty marker takes no cells.
//!
//! ```rust
//! use editrix_core::{EditorOptions, InputEvent, KeyEvent, headless_engine};
//!
//! let mut engine = headless_engine(&EditorOptions::default()).unwrap();
//! let _subscription = engine.attach().unwrap();
//! for c in "Hi".chars() {
//!     engine.handle_event(&InputEvent::Key(KeyEvent::char(c)));
//! }
//! let lines = engine.editor().renderer().lines();
//! assert_eq!(lines[0].text(), "Hi");
//! assert_eq!(lines[0].caret, Some(2));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use unicode_width::UnicodeWidthChar;

use crate::block::BlockNode;
use crate::caret::{CaretRect, Surface, SurfaceCaretManager, TextPosition};
use crate::document::Document;
use crate::engine::{Engine, EngineError};
use crate::id::NodeId;
use crate::options::EditorOptions;
use crate::render::{Attributes, BOLD_TAG, Locator, NODE_ID_ATTRIBUTE, RenderError, Renderer};
use crate::run::EMPTY_MARKER;

/// Height of one row.
pub const LINE_HEIGHT: f32 = 1.0;

const HOST_TAG: &str = "div";

/// Handle of a node in a [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceNode(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String, attributes: Attributes },
    Text(String),
}

#[derive(Debug, Clone)]
struct Entry {
    kind: NodeKind,
    parent: Option<SurfaceNode>,
    children: Vec<SurfaceNode>,
}

#[derive(Debug)]
struct SurfaceTree {
    entries: Vec<Entry>,
    /// Released slots, reused by `add`.
    free: Vec<SurfaceNode>,
    selection: Option<TextPosition<SurfaceNode>>,
}

impl SurfaceTree {
    fn new() -> Self {
        let host = Entry {
            kind: NodeKind::Element {
                tag: HOST_TAG.to_string(),
                attributes: Attributes::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            entries: vec![host],
            free: Vec::new(),
            selection: None,
        }
    }

    fn host(&self) -> SurfaceNode {
        SurfaceNode(0)
    }

    fn entry(&self, node: SurfaceNode) -> Option<&Entry> {
        self.entries.get(node.0)
    }

    fn add(&mut self, kind: NodeKind) -> SurfaceNode {
        let entry = Entry {
            kind,
            parent: None,
            children: Vec::new(),
        };
        if let Some(node) = self.free.pop()
            && let Some(slot) = self.entries.get_mut(node.0)
        {
            *slot = entry;
            return node;
        }
        let node = SurfaceNode(self.entries.len());
        self.entries.push(entry);
        node
    }

    /// Detach `node` and recycle it together with its subtree.
    ///
    /// A selection inside the subtree is cleared, since its handle may be handed out again.
    fn release(&mut self, node: SurfaceNode) {
        if node == self.host() {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self
                .selection
                .is_some_and(|position| position.node == current)
            {
                self.selection = None;
            }
            if let Some(entry) = self.entries.get_mut(current.0) {
                stack.append(&mut entry.children);
                entry.kind = NodeKind::Text(String::new());
                entry.parent = None;
                self.free.push(current);
            }
        }
    }

    fn insert_child(&mut self, parent: SurfaceNode, index: usize, child: SurfaceNode) {
        self.detach(child);
        if let Some(entry) = self.entries.get_mut(parent.0) {
            let index = index.min(entry.children.len());
            entry.children.insert(index, child);
        }
        if let Some(entry) = self.entries.get_mut(child.0) {
            entry.parent = Some(parent);
        }
    }

    fn append_child(&mut self, parent: SurfaceNode, child: SurfaceNode) {
        let index = self.entry(parent).map(|e| e.children.len()).unwrap_or(0);
        self.insert_child(parent, index, child);
    }

    fn detach(&mut self, node: SurfaceNode) {
        let parent = match self.entries.get_mut(node.0) {
            Some(entry) => entry.parent.take(),
            None => return,
        };
        if let Some(parent) = parent
            && let Some(entry) = self.entries.get_mut(parent.0)
        {
            entry.children.retain(|child| *child != node);
        }
    }

    fn clear_children(&mut self, node: SurfaceNode) {
        let children = self
            .entry(node)
            .map(|e| e.children.clone())
            .unwrap_or_default();
        for child in children {
            self.release(child);
        }
    }

    fn is_attached(&self, node: SurfaceNode) -> bool {
        let mut current = node;
        loop {
            if current == self.host() {
                return true;
            }
            match self.entry(current).and_then(|e| e.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn attribute(&self, node: SurfaceNode, name: &str) -> Option<&str> {
        match &self.entry(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    fn tag(&self, node: SurfaceNode) -> Option<&str> {
        match &self.entry(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    fn text(&self, node: SurfaceNode) -> Option<&str> {
        match &self.entry(node)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    fn find_element(&self, id: NodeId) -> Option<SurfaceNode> {
        let wanted = id.to_string();
        let mut stack = vec![self.host()];
        while let Some(node) = stack.pop() {
            if self.attribute(node, NODE_ID_ATTRIBUTE) == Some(wanted.as_str()) {
                return Some(node);
            }
            if let Some(entry) = self.entry(node) {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        None
    }

    /// The mounted document root.
    fn content_root(&self) -> Option<SurfaceNode> {
        self.entry(self.host())?.children.first().copied()
    }

    fn rows(&self) -> Vec<SurfaceNode> {
        let Some(root) = self.content_root() else {
            return Vec::new();
        };
        self.entry(root)
            .map(|e| {
                e.children
                    .iter()
                    .copied()
                    .filter(|child| self.tag(*child).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Text leaves under `node` with whether they sit inside a bold wrapper.
    fn leaves(&self, node: SurfaceNode, bold: bool, out: &mut Vec<(SurfaceNode, bool)>) {
        let Some(entry) = self.entry(node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Text(_) => out.push((node, bold)),
            NodeKind::Element { tag, .. } => {
                let bold = bold || tag == BOLD_TAG;
                for child in &entry.children {
                    self.leaves(*child, bold, out);
                }
            }
        }
    }

    fn row_leaves(&self, row: SurfaceNode) -> Vec<(SurfaceNode, bool)> {
        let mut leaves = Vec::new();
        self.leaves(row, false, &mut leaves);
        leaves
    }

    fn row_of(&self, node: SurfaceNode) -> Option<usize> {
        let root = self.content_root()?;
        let mut current = node;
        loop {
            let parent = self.entry(current)?.parent?;
            if parent == root {
                return self.rows().iter().position(|row| *row == current);
            }
            current = parent;
        }
    }

    /// Column of `position` within its row.
    fn column_of(&self, row: SurfaceNode, position: TextPosition<SurfaceNode>) -> usize {
        let mut column = 0;
        for (leaf, _) in self.row_leaves(row) {
            let text = self.text(leaf).unwrap_or("");
            if leaf == position.node {
                return column + text_cells(text.chars().take(position.offset));
            }
            column += text_cells(text.chars());
        }
        column
    }

    fn build_block(&mut self, block: &BlockNode) -> SurfaceNode {
        let element = self.add(NodeKind::Element {
            tag: block.tag().as_str().to_string(),
            attributes: block.attributes().clone(),
        });
        self.fill_runs(element, block);
        element
    }

    fn fill_runs(&mut self, element: SurfaceNode, block: &BlockNode) {
        for run in block.runs() {
            let leaf = self.add(NodeKind::Text(run.text().to_string()));
            if run.is_bold() {
                let wrapper = self.add(NodeKind::Element {
                    tag: BOLD_TAG.to_string(),
                    attributes: Attributes::new(),
                });
                self.append_child(wrapper, leaf);
                self.append_child(element, wrapper);
            } else {
                self.append_child(element, leaf);
            }
        }
    }
}

fn char_cells(c: char) -> usize {
    if c == EMPTY_MARKER {
        0
    } else {
        c.width().unwrap_or(0)
    }
}

fn text_cells(chars: impl Iterator<Item = char>) -> usize {
    chars.map(char_cells).sum()
}

/// A styled piece of a rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpan {
    /// Text with empty markers removed.
    pub text: String,
    /// Whether the span is inside a bold wrapper.
    pub bold: bool,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLine {
    /// Id of the block rendered on this row.
    pub block_id: Option<NodeId>,
    /// Element tag (`p`, `h1`, ...).
    pub tag: String,
    /// Spans in order. Empty runs are omitted.
    pub spans: Vec<SurfaceSpan>,
    /// Caret column, when the selection is on this row.
    pub caret: Option<usize>,
}

impl SurfaceLine {
    /// Plain text of the row.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.spans
            .iter()
            .map(|span| text_cells(span.text.chars()))
            .sum()
    }
}

/// Shared handle to an in-memory surface. Clones see the same tree.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    tree: Rc<RefCell<SurfaceTree>>,
}

impl HeadlessSurface {
    /// Empty surface with nothing mounted.
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(SurfaceTree::new())),
        }
    }

    /// Snapshot of the rendered rows.
    pub fn lines(&self) -> Vec<SurfaceLine> {
        let tree = self.tree.borrow();
        let selection = tree
            .selection
            .filter(|position| tree.is_attached(position.node));
        let caret_row = selection.and_then(|position| tree.row_of(position.node));

        tree.rows()
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let spans = tree
                    .row_leaves(row)
                    .into_iter()
                    .filter_map(|(leaf, bold)| {
                        let text: String = tree
                            .text(leaf)
                            .unwrap_or("")
                            .chars()
                            .filter(|c| *c != EMPTY_MARKER)
                            .collect();
                        (!text.is_empty()).then_some(SurfaceSpan { text, bold })
                    })
                    .collect();
                let caret = match (caret_row, selection) {
                    (Some(caret_row), Some(position)) if caret_row == index => {
                        Some(tree.column_of(row, position))
                    }
                    _ => None,
                };
                SurfaceLine {
                    block_id: tree
                        .attribute(row, NODE_ID_ATTRIBUTE)
                        .and_then(|id| id.parse().ok()),
                    tag: tree.tag(row).unwrap_or_default().to_string(),
                    spans,
                    caret,
                }
            })
            .collect()
    }

    /// Logical text rendered for block `id`.
    pub fn rendered_text(&self, id: NodeId) -> Option<String> {
        let tree = self.tree.borrow();
        let element = tree.find_element(id)?;
        Some(
            tree.row_leaves(element)
                .into_iter()
                .filter_map(|(leaf, _)| tree.text(leaf))
                .flat_map(str::chars)
                .filter(|c| *c != EMPTY_MARKER)
                .collect(),
        )
    }

    /// Attribute of the element rendered for `id`.
    pub fn rendered_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let tree = self.tree.borrow();
        let element = tree.find_element(id)?;
        tree.attribute(element, name).map(str::to_string)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.tree.borrow().rows().len()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessSurface {
    fn mount(&mut self, document: &Document) -> Result<(), RenderError> {
        let mut tree = self.tree.borrow_mut();
        let host = tree.host();
        tree.clear_children(host);
        tree.selection = None;

        let container = document.root();
        let root = tree.add(NodeKind::Element {
            tag: container.tag().to_string(),
            attributes: container.attributes().clone(),
        });
        tree.append_child(host, root);
        for block in document.blocks() {
            let element = tree.build_block(block);
            tree.append_child(root, element);
        }
        log::debug!("mounted {} block(s)", document.len());
        Ok(())
    }

    fn create_node(
        &mut self,
        block: &BlockNode,
        parent: &Locator,
        sibling: Option<&Locator>,
    ) -> Result<(), RenderError> {
        let mut tree = self.tree.borrow_mut();
        let parent_element = tree
            .find_element(parent.node_id())
            .ok_or(RenderError::ParentNotFound(*parent))?;

        let (container, index) = match sibling {
            Some(sibling) => {
                let sibling_element = tree
                    .find_element(sibling.node_id())
                    .ok_or(RenderError::SiblingNotFound(*sibling))?;
                let container = tree
                    .entry(sibling_element)
                    .and_then(|e| e.parent)
                    .ok_or(RenderError::SiblingNotFound(*sibling))?;
                let index = tree
                    .entry(container)
                    .and_then(|e| e.children.iter().position(|c| *c == sibling_element))
                    .ok_or(RenderError::SiblingNotFound(*sibling))?;
                (container, index + 1)
            }
            None => (parent_element, 0),
        };

        let element = tree.build_block(block);
        tree.insert_child(container, index, element);
        Ok(())
    }

    fn update_node(&mut self, block: &BlockNode) {
        let mut tree = self.tree.borrow_mut();
        let Some(element) = tree.find_element(block.id()) else {
            log::trace!("update_node: {} is not rendered", block.id());
            return;
        };
        if let Some(entry) = tree.entries.get_mut(element.0) {
            entry.kind = NodeKind::Element {
                tag: block.tag().as_str().to_string(),
                attributes: block.attributes().clone(),
            };
        }
        tree.clear_children(element);
        tree.fill_runs(element, block);
    }

    fn delete_node(&mut self, id: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        if let Some(element) = tree.find_element(*id) {
            tree.release(element);
        }
    }
}

impl Surface for HeadlessSurface {
    type Node = SurfaceNode;

    fn find_element(&self, id: NodeId) -> Option<SurfaceNode> {
        self.tree.borrow().find_element(id)
    }

    fn parent(&self, node: SurfaceNode) -> Option<SurfaceNode> {
        self.tree.borrow().entry(node)?.parent
    }

    fn first_child(&self, node: SurfaceNode) -> Option<SurfaceNode> {
        self.tree.borrow().entry(node)?.children.first().copied()
    }

    fn last_child(&self, node: SurfaceNode) -> Option<SurfaceNode> {
        self.tree.borrow().entry(node)?.children.last().copied()
    }

    fn next_sibling(&self, node: SurfaceNode) -> Option<SurfaceNode> {
        let tree = self.tree.borrow();
        let parent = tree.entry(node)?.parent?;
        let siblings = &tree.entry(parent)?.children;
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    fn previous_sibling(&self, node: SurfaceNode) -> Option<SurfaceNode> {
        let tree = self.tree.borrow();
        let parent = tree.entry(node)?.parent?;
        let siblings = &tree.entry(parent)?.children;
        let index = siblings.iter().position(|c| *c == node)?;
        index.checked_sub(1).map(|prev| siblings[prev])
    }

    fn text(&self, node: SurfaceNode) -> Option<String> {
        self.tree.borrow().text(node).map(str::to_string)
    }

    fn node_id(&self, node: SurfaceNode) -> Option<NodeId> {
        self.tree
            .borrow()
            .attribute(node, NODE_ID_ATTRIBUTE)
            .and_then(|id| id.parse().ok())
    }

    fn append_text(&mut self, parent: SurfaceNode, text: &str) -> Option<SurfaceNode> {
        let mut tree = self.tree.borrow_mut();
        tree.tag(parent)?;
        let leaf = tree.add(NodeKind::Text(text.to_string()));
        tree.append_child(parent, leaf);
        Some(leaf)
    }

    fn selection(&self) -> Option<TextPosition<SurfaceNode>> {
        let tree = self.tree.borrow();
        tree.selection
            .filter(|position| tree.is_attached(position.node))
    }

    fn set_selection(&mut self, position: TextPosition<SurfaceNode>) {
        self.tree.borrow_mut().selection = Some(position);
    }

    fn caret_rect(&self) -> Option<CaretRect> {
        let tree = self.tree.borrow();
        let position = tree.selection?;
        if !tree.is_attached(position.node) {
            return None;
        }
        let row_index = tree.row_of(position.node)?;
        let row = *tree.rows().get(row_index)?;
        Some(CaretRect {
            left: tree.column_of(row, position) as f32,
            top: row_index as f32 * LINE_HEIGHT,
            width: 0.0,
            height: LINE_HEIGHT,
        })
    }

    fn line_height(&self, _element: SurfaceNode) -> f32 {
        LINE_HEIGHT
    }

    fn position_from_point(&self, x: f32, y: f32) -> Option<TextPosition<SurfaceNode>> {
        if y < 0.0 {
            return None;
        }
        let tree = self.tree.borrow();
        let rows = tree.rows();
        let row = *rows.get((y / LINE_HEIGHT).floor() as usize)?;

        let mut best: Option<(f32, TextPosition<SurfaceNode>)> = None;
        let mut column = 0;
        for (leaf, _) in tree.row_leaves(row) {
            let text = tree.text(leaf).unwrap_or("");
            let mut boundary = column;
            for (offset, c) in std::iter::once(None)
                .chain(text.chars().map(Some))
                .enumerate()
            {
                if let Some(c) = c {
                    boundary += char_cells(c);
                }
                let distance = (boundary as f32 - x).abs();
                if best.is_none_or(|(closest, _)| distance < closest) {
                    best = Some((distance, TextPosition::new(leaf, offset)));
                }
            }
            column = boundary;
        }
        best.map(|(_, position)| position)
    }
}

/// Engine wired to a [`HeadlessSurface`].
pub type HeadlessEngine = Engine<HeadlessSurface, SurfaceCaretManager<HeadlessSurface>>;

/// Build an engine over a fresh [`HeadlessSurface`]. The surface is reachable through
/// `engine.editor().renderer()`.
pub fn headless_engine(options: &EditorOptions) -> Result<HeadlessEngine, EngineError> {
    let surface = HeadlessSurface::new();
    let caret = SurfaceCaretManager::new(surface.clone());
    Engine::new(options, surface, caret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockTag;
    use crate::run::TextRun;

    fn mounted(texts: &[&str]) -> (HeadlessSurface, Document, Vec<NodeId>) {
        let mut document = Document::new(BlockTag::Paragraph);
        let mut ids = Vec::new();
        let mut previous = document.first_block();
        for (index, text) in texts.iter().enumerate() {
            let id = if index == 0 {
                document.first_block().unwrap()
            } else {
                let block = BlockNode::new(BlockTag::Paragraph, document.root().id());
                document.insert_block_after(block, previous.unwrap()).unwrap()
            };
            document
                .block_mut(id)
                .unwrap()
                .insert_runs_at(vec![TextRun::new(text)], 0);
            previous = Some(id);
            ids.push(id);
        }
        let mut surface = HeadlessSurface::new();
        surface.mount(&document).unwrap();
        (surface, document, ids)
    }

    #[test]
    fn test_mount_renders_rows() {
        let (surface, document, ids) = mounted(&["one", "two"]);
        let lines = surface.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "one");
        assert_eq!(lines[1].block_id, Some(ids[1]));
        assert_eq!(lines[0].tag, "p");
        assert!(surface.find_element(document.root().id()).is_some());
        assert_eq!(
            surface.rendered_attribute(ids[0], "contenteditable").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_create_node_after_sibling_and_first() {
        let (mut surface, document, ids) = mounted(&["one"]);
        let root = Locator::node(document.root().id());
        let mut after = BlockNode::new(BlockTag::Heading1, document.root().id());
        after.insert_runs_at(vec![TextRun::new("after")], 0);
        let mut first = BlockNode::new(BlockTag::Paragraph, document.root().id());
        first.insert_runs_at(vec![TextRun::new("first")], 0);

        surface
            .create_node(&after, &root, Some(&Locator::node(ids[0])))
            .unwrap();
        surface.create_node(&first, &root, None).unwrap();

        let texts: Vec<String> = surface.lines().iter().map(SurfaceLine::text).collect();
        assert_eq!(texts, vec!["first", "one", "after"]);
        assert_eq!(surface.lines()[2].tag, "h1");
    }

    #[test]
    fn test_create_node_reports_missing_locators() {
        let (mut surface, document, _) = mounted(&["one"]);
        let block = BlockNode::new(BlockTag::Paragraph, document.root().id());
        let missing = Locator::node(NodeId::next());
        assert_eq!(
            surface.create_node(&block, &missing, None),
            Err(RenderError::ParentNotFound(missing))
        );
        let root = Locator::node(document.root().id());
        assert_eq!(
            surface.create_node(&block, &root, Some(&missing)),
            Err(RenderError::SiblingNotFound(missing))
        );
        assert_eq!(surface.row_count(), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let (mut surface, mut document, ids) = mounted(&["one", "two"]);
        let block = document.block_mut(ids[0]).unwrap();
        block.insert_run(TextRun::new("!").with_bold(true), 1);
        block.set_tag(BlockTag::Heading2);
        let block = document.block(ids[0]).unwrap();
        surface.update_node(block);

        let line = &surface.lines()[0];
        assert_eq!(line.tag, "h2");
        assert_eq!(
            line.spans,
            vec![
                SurfaceSpan {
                    text: "one".into(),
                    bold: false
                },
                SurfaceSpan {
                    text: "!".into(),
                    bold: true
                },
            ]
        );

        surface.delete_node(&ids[1]);
        surface.delete_node(&NodeId::next());
        assert_eq!(surface.row_count(), 1);
        assert_eq!(surface.rendered_text(ids[1]), None);

        let orphan = BlockNode::new(BlockTag::Paragraph, document.root().id());
        surface.update_node(&orphan);
        assert_eq!(surface.row_count(), 1);
    }

    #[test]
    fn test_geometry_uses_cell_widths() {
        let (mut surface, _, ids) = mounted(&["a中b", "xyz"]);
        let row = surface.find_element(ids[0]).unwrap();
        let leaf = surface.first_child(row).unwrap();
        surface.set_selection(TextPosition::new(leaf, 2));
        let rect = surface.caret_rect().unwrap();
        assert_eq!((rect.left, rect.top), (3.0, 0.0));
        assert_eq!(surface.lines()[0].caret, Some(3));
        assert_eq!(surface.lines()[0].width(), 4);

        let hit = surface.position_from_point(2.6, 0.2).unwrap();
        assert_eq!(hit, TextPosition::new(leaf, 2));
        let hit = surface.position_from_point(50.0, 1.5).unwrap();
        assert_eq!(surface.text(hit.node).as_deref(), Some("xyz"));
        assert_eq!(hit.offset, 3);
        assert!(surface.position_from_point(0.0, 2.0).is_none());
        assert!(surface.position_from_point(0.0, -1.0).is_none());
    }

    #[test]
    fn test_selection_is_dropped_when_detached() {
        let (mut surface, document, ids) = mounted(&["one"]);
        let row = surface.find_element(ids[0]).unwrap();
        let leaf = surface.first_child(row).unwrap();
        surface.set_selection(TextPosition::new(leaf, 1));
        assert!(surface.selection().is_some());

        surface.update_node(document.block(ids[0]).unwrap());
        assert!(surface.selection().is_none());
        assert!(surface.caret_rect().is_none());
    }

    #[test]
    fn test_rebuilt_nodes_reuse_released_slots() {
        let (mut surface, mut document, ids) = mounted(&["a"]);
        let baseline = surface.tree.borrow().entries.len();
        for i in 0..500 {
            let block = document.block_mut(ids[0]).unwrap();
            let text = format!("{}{}", block.runs()[0].text(), i % 10);
            block.run_mut(0).unwrap().set_text(&text);
            if i % 50 == 0 {
                block.insert_run(TextRun::new("b").with_bold(true), 1);
            }
            surface.update_node(document.block(ids[0]).unwrap());
        }
        let entries = surface.tree.borrow().entries.len();
        assert!(entries <= baseline + 24, "{} entries", entries);
        assert_eq!(
            surface.rendered_text(ids[0]),
            Some(document.block(ids[0]).unwrap().text_content())
        );

        surface.delete_node(&ids[0]);
        assert_eq!(surface.row_count(), 0);
        let free = surface.tree.borrow().free.len();
        assert!(free >= document.block(ids[0]).unwrap().runs().len());
    }
}
