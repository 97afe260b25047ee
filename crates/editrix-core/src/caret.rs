//! Caret placement and movement against a rendered surface.
//!
//! The editor keeps the logical caret as a (block, offset) pair. [`CaretManager`] turns that
//! pair into a physical selection on the surface, and turns directional intents back into a
//! logical pair. [`SurfaceCaretManager`] implements it over any [`Surface`].
//!
//! Horizontal movement walks the *rendered* tree rather than the document, because inline
//! wrappers (the element around a bold run) sit between a block element and its text. Vertical
//! movement is a geometric heuristic: shift the caret rectangle by one line height and ask the
//! surface what is there.

use std::fmt;

use crate::id::NodeId;
use crate::run::EMPTY_MARKER;

/// Direction of a caret move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaretDirection {
    /// One character back.
    Left,
    /// One character forward.
    Right,
    /// One line up.
    Up,
    /// One line down.
    Down,
}

impl CaretDirection {
    /// Direction of an arrow key name.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(CaretDirection::Left),
            "ArrowRight" => Some(CaretDirection::Right),
            "ArrowUp" => Some(CaretDirection::Up),
            "ArrowDown" => Some(CaretDirection::Down),
            _ => None,
        }
    }

    /// Whether this is a left/right move.
    pub fn is_horizontal(self) -> bool {
        matches!(self, CaretDirection::Left | CaretDirection::Right)
    }
}

/// A collapsed selection: a text leaf and a character offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition<N> {
    /// Text leaf.
    pub node: N,
    /// Character offset within the leaf.
    pub offset: usize,
}

impl<N> TextPosition<N> {
    /// Position at `offset` in `node`.
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Bounding box of the caret in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width (zero for a collapsed caret).
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl CaretRect {
    /// Vertical midpoint.
    pub fn mid_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Result of a caret operation, resolved against the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretPosition {
    /// Block owning the caret leaf.
    pub block_id: NodeId,
    /// Index of the caret leaf among the block's text leaves.
    pub leaf_index: usize,
    /// Offset within that leaf.
    pub offset: usize,
}

/// Read/write access to a rendered surface, as needed for caret work.
pub trait Surface {
    /// Handle of a rendered node (element or text leaf).
    type Node: Copy + Eq + fmt::Debug;

    /// Element rendered for `id`.
    fn find_element(&self, id: NodeId) -> Option<Self::Node>;
    /// Parent node.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    /// First child.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    /// Last child.
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;
    /// Next sibling.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    /// Previous sibling.
    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    /// Text of a text leaf; `None` for elements.
    fn text(&self, node: Self::Node) -> Option<String>;
    /// Value of the identity attribute of an element.
    fn node_id(&self, node: Self::Node) -> Option<NodeId>;
    /// Append a text leaf to `parent`.
    fn append_text(&mut self, parent: Self::Node, text: &str) -> Option<Self::Node>;
    /// Current native selection, if any.
    fn selection(&self) -> Option<TextPosition<Self::Node>>;
    /// Replace the native selection.
    fn set_selection(&mut self, position: TextPosition<Self::Node>);
    /// Bounding box of the current selection.
    fn caret_rect(&self) -> Option<CaretRect>;
    /// Line height used for vertical steps inside `element`.
    fn line_height(&self, element: Self::Node) -> f32;
    /// Caret position under a point.
    fn position_from_point(&self, x: f32, y: f32) -> Option<TextPosition<Self::Node>>;
}

/// Caret placement as consumed by the editor.
pub trait CaretManager {
    /// Set the rendered document root, which bounds horizontal walks.
    fn set_root(&mut self, root: NodeId);

    /// Place the caret at raw `offset` of `block`. `None` when the block is not rendered.
    fn set_cursor_position(&mut self, block: NodeId, offset: usize) -> Option<CaretPosition>;

    /// Move the caret from (`block`, `offset`). `None` when no position could be resolved.
    fn move_cursor(
        &mut self,
        block: NodeId,
        offset: usize,
        direction: CaretDirection,
    ) -> Option<CaretPosition>;

    /// Place the caret under a point (pointer click).
    fn set_cursor_from_point(&mut self, x: f32, y: f32) -> Option<CaretPosition>;
}

/// [`CaretManager`] over a [`Surface`].
#[derive(Debug, Clone)]
pub struct SurfaceCaretManager<S> {
    surface: S,
    root: Option<NodeId>,
}

impl<S: Surface> SurfaceCaretManager<S> {
    /// Manager driving `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            root: None,
        }
    }

    /// Underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn leaf_len(&self, leaf: S::Node) -> usize {
        self.surface
            .text(leaf)
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    /// Text leaves a caret may stop in. Whitespace-only leaves count only inside a block;
    /// elsewhere they are formatting between elements.
    fn is_visible_leaf(&self, node: S::Node) -> bool {
        let Some(text) = self.surface.text(node) else {
            return false;
        };
        if !text.trim().is_empty() {
            return true;
        }
        self.owning_block(node)
            .is_some_and(|(id, _)| Some(id) != self.root)
    }

    /// Text leaves under `element`, in document order.
    fn block_leaves(&self, element: S::Node) -> Vec<S::Node> {
        let mut leaves = Vec::new();
        let mut stack = vec![element];
        while let Some(node) = stack.pop() {
            if self.surface.text(node).is_some() {
                leaves.push(node);
                continue;
            }
            let mut children = Vec::new();
            let mut child = self.surface.first_child(node);
            while let Some(current) = child {
                children.push(current);
                child = self.surface.next_sibling(current);
            }
            stack.extend(children.into_iter().rev());
        }
        leaves
    }

    /// Nearest element carrying an identity, starting from `node` itself.
    fn owning_block(&self, node: S::Node) -> Option<(NodeId, S::Node)> {
        let mut current = Some(node);
        while let Some(node) = current {
            if let Some(id) = self.surface.node_id(node) {
                return Some((id, node));
            }
            current = self.surface.parent(node);
        }
        None
    }

    fn resolve(&self, position: TextPosition<S::Node>) -> Option<CaretPosition> {
        let (block_id, element) = self.owning_block(position.node)?;
        let leaf_index = self
            .block_leaves(element)
            .iter()
            .position(|leaf| *leaf == position.node)?;
        Some(CaretPosition {
            block_id,
            leaf_index,
            offset: position.offset,
        })
    }

    /// Raw block offset of a selection, if it lies inside `block`.
    fn block_offset(&self, block: NodeId, position: TextPosition<S::Node>) -> Option<usize> {
        let (owner, element) = self.owning_block(position.node)?;
        if owner != block {
            return None;
        }
        let mut start = 0;
        for leaf in self.block_leaves(element) {
            if leaf == position.node {
                return Some(start + position.offset);
            }
            start += self.leaf_len(leaf);
        }
        None
    }

    /// Explicit placement: find the leaf holding raw `offset` of `block`, with an offset on a
    /// leaf boundary resolving to the earlier leaf.
    fn place(&mut self, block: NodeId, offset: usize) -> Option<TextPosition<S::Node>> {
        let element = self.surface.find_element(block)?;
        let leaves = self.block_leaves(element);

        let position = if leaves.is_empty() {
            let leaf = self
                .surface
                .append_text(element, &EMPTY_MARKER.to_string())?;
            TextPosition::new(leaf, 0)
        } else {
            let mut start = 0;
            let mut found = None;
            for leaf in &leaves {
                let len = self.leaf_len(*leaf);
                if start + len >= offset {
                    found = Some(TextPosition::new(*leaf, offset - start));
                    break;
                }
                start += len;
            }
            match found {
                Some(position) => position,
                None => {
                    let last = *leaves.last()?;
                    TextPosition::new(last, self.leaf_len(last))
                }
            }
        };

        self.surface.set_selection(position);
        Some(position)
    }

    /// The selection when it still matches the logical caret, otherwise an explicit placement.
    fn active_leaf(&mut self, block: NodeId, offset: usize) -> Option<TextPosition<S::Node>> {
        if let Some(selection) = self.surface.selection()
            && self.block_offset(block, selection) == Some(offset)
        {
            return Some(selection);
        }
        self.place(block, offset)
    }

    fn root_element(&self) -> Option<S::Node> {
        self.root.and_then(|root| self.surface.find_element(root))
    }

    fn next_in_preorder(&self, node: S::Node, root: S::Node) -> Option<S::Node> {
        if let Some(child) = self.surface.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if current == root {
                return None;
            }
            if let Some(sibling) = self.surface.next_sibling(current) {
                return Some(sibling);
            }
            current = self.surface.parent(current)?;
        }
    }

    fn previous_in_preorder(&self, node: S::Node, root: S::Node) -> Option<S::Node> {
        if node == root {
            return None;
        }
        match self.surface.previous_sibling(node) {
            Some(mut sibling) => {
                while let Some(last) = self.surface.last_child(sibling) {
                    sibling = last;
                }
                Some(sibling)
            }
            None => self.surface.parent(node),
        }
    }

    /// Adjacent visible text leaf in document order, never leaving the document root.
    fn adjacent_leaf(&self, from: S::Node, forward: bool) -> Option<S::Node> {
        let root = self.root_element()?;
        let mut current = from;
        loop {
            current = if forward {
                self.next_in_preorder(current, root)?
            } else {
                self.previous_in_preorder(current, root)?
            };
            if self.is_visible_leaf(current) {
                return Some(current);
            }
        }
    }

    fn move_horizontal(
        &mut self,
        block: NodeId,
        offset: usize,
        forward: bool,
    ) -> Option<CaretPosition> {
        let active = self.active_leaf(block, offset)?;
        let len = self.leaf_len(active.node);

        let target = if forward {
            if active.offset < len {
                TextPosition::new(active.node, active.offset + 1)
            } else {
                match self.adjacent_leaf(active.node, true) {
                    Some(next) => TextPosition::new(next, 0),
                    None => TextPosition::new(active.node, len),
                }
            }
        } else if active.offset > 0 {
            TextPosition::new(active.node, active.offset - 1)
        } else {
            match self.adjacent_leaf(active.node, false) {
                Some(previous) => TextPosition::new(previous, self.leaf_len(previous)),
                None => TextPosition::new(active.node, 0),
            }
        };

        log::trace!(
            "caret {}: {:?}@{} -> {:?}@{}",
            if forward { "right" } else { "left" },
            active.node,
            active.offset,
            target.node,
            target.offset
        );
        self.surface.set_selection(target);
        self.resolve(target)
    }

    fn move_vertical(&mut self, block: NodeId, offset: usize, up: bool) -> Option<CaretPosition> {
        let element = self.surface.find_element(block)?;
        self.active_leaf(block, offset)?;
        let rect = self.surface.caret_rect()?;
        let line_height = self.surface.line_height(element);
        let y = if up {
            rect.mid_y() - line_height
        } else {
            rect.mid_y() + line_height
        };

        let target = self.surface.position_from_point(rect.left, y)?;
        log::trace!("caret vertical hit test at ({}, {}) -> {:?}", rect.left, y, target);
        self.surface.set_selection(target);
        self.resolve(target)
    }
}

impl<S: Surface> CaretManager for SurfaceCaretManager<S> {
    fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    fn set_cursor_position(&mut self, block: NodeId, offset: usize) -> Option<CaretPosition> {
        let position = self.place(block, offset)?;
        self.resolve(position)
    }

    fn move_cursor(
        &mut self,
        block: NodeId,
        offset: usize,
        direction: CaretDirection,
    ) -> Option<CaretPosition> {
        match direction {
            CaretDirection::Left => self.move_horizontal(block, offset, false),
            CaretDirection::Right => self.move_horizontal(block, offset, true),
            CaretDirection::Up => self.move_vertical(block, offset, true),
            CaretDirection::Down => self.move_vertical(block, offset, false),
        }
    }

    fn set_cursor_from_point(&mut self, x: f32, y: f32) -> Option<CaretPosition> {
        let target = self.surface.position_from_point(x, y)?;
        self.surface.set_selection(target);
        self.resolve(target)
    }
}
