//! Editing operations.
//!
//! [`EditorCore`] owns the document and the logical [`Cursor`]. Every operation mutates the
//! tree, pushes the change through the [`Renderer`], and then re-asserts the cursor through the
//! [`CaretManager`]. The surface selection is never trusted as input, except for pointer
//! placement and caret movement, which report their result back as a [`CaretPosition`].
//!
//! Operations are silent no-ops when there is no current block or the cursor does not resolve
//! to a run.

use crate::block::{BlockNode, BlockTag};
use crate::caret::{CaretDirection, CaretManager, CaretPosition};
use crate::document::Document;
use crate::id::NodeId;
use crate::render::{Locator, RenderError, Renderer};
use crate::run::{EMPTY_MARKER, TextRun, byte_offset};

/// The logical insertion point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Current block.
    pub block: Option<NodeId>,
    /// Raw character offset into the block (empty markers count as one character).
    pub offset: usize,
}

impl Cursor {
    /// Cursor at `offset` of `block`.
    pub fn new(block: NodeId, offset: usize) -> Self {
        Self {
            block: Some(block),
            offset,
        }
    }
}

/// Document, renderer and caret manager, driven by editing operations.
#[derive(Debug)]
pub struct EditorCore<R, C> {
    document: Document,
    renderer: R,
    caret: C,
    cursor: Cursor,
}

impl<R: Renderer, C: CaretManager> EditorCore<R, C> {
    /// Wrap a document. The cursor starts at the beginning of the first block; nothing is
    /// rendered until [`EditorCore::mount`].
    pub fn new(document: Document, renderer: R, caret: C) -> Self {
        let cursor = Cursor {
            block: document.first_block(),
            offset: 0,
        };
        Self {
            document,
            renderer,
            caret,
            cursor,
        }
    }

    /// Render the whole document and place the caret.
    pub fn mount(&mut self) -> Result<(), RenderError> {
        self.renderer.mount(&self.document)?;
        self.caret.set_root(self.document.root().id());
        self.restore_focus();
        Ok(())
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The caret manager.
    pub fn caret(&self) -> &C {
        &self.caret
    }

    /// The logical cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Block the cursor is in.
    pub fn current_block(&self) -> Option<&BlockNode> {
        self.cursor.block.and_then(|id| self.document.block(id))
    }

    /// Move the cursor to `offset` of `block` (clamped to the block length).
    pub fn set_cursor(&mut self, block: NodeId, offset: usize) -> bool {
        let Some(node) = self.document.block(block) else {
            log::debug!("set_cursor: unknown block {}", block);
            return false;
        };
        self.cursor = Cursor::new(block, offset.min(node.raw_len()));
        self.restore_focus();
        true
    }

    /// Re-assert the logical cursor on the surface.
    pub fn restore_focus(&mut self) {
        let Some(block) = self.cursor.block else {
            return;
        };
        if self
            .caret
            .set_cursor_position(block, self.cursor.offset)
            .is_none()
        {
            log::debug!("restore_focus: block {} is not rendered", block);
        }
    }

    /// Insert `c` at the cursor.
    pub fn insert_char(&mut self, c: char) {
        if c == EMPTY_MARKER {
            return;
        }
        let Some(block_id) = self.cursor.block else {
            log::debug!("insert_char: no current block");
            return;
        };
        let Some(block) = self.document.block_mut(block_id) else {
            return;
        };
        let Some(location) = block.locate(self.cursor.offset) else {
            log::debug!("insert_char: offset {} out of range", self.cursor.offset);
            return;
        };
        let Some(run) = block.run_mut(location.index) else {
            return;
        };

        let text = run.text();
        let split = byte_offset(text, location.local);
        // Typing into an empty run replaces its marker rather than extending it.
        let consumes_marker = text[..split].starts_with(EMPTY_MARKER);
        let mut next = String::with_capacity(text.len() + c.len_utf8());
        next.push_str(&text[..split]);
        next.push(c);
        next.push_str(&text[split..]);
        run.set_text(&next);

        if !consumes_marker {
            self.cursor.offset += 1;
        }
        self.renderer.update_node(block);
        self.restore_focus();
    }

    /// Insert `text` at the cursor. Line breaks split the block.
    pub fn insert_text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.enter(),
                '\r' => {}
                c => self.insert_char(c),
            }
        }
    }

    /// Split the current block at the cursor.
    pub fn enter(&mut self) {
        let Some(block_id) = self.cursor.block else {
            return;
        };
        let Some(block) = self.document.block_mut(block_id) else {
            return;
        };
        let Some(location) = block.locate(self.cursor.offset) else {
            return;
        };

        let bold = block.runs()[location.index].is_bold();
        let tail = block
            .split_run_at_offset(location.index, location.local)
            .unwrap_or_else(|| TextRun::empty().with_bold(bold));
        let mut moved = block.remove_runs_from(location.index + 1);
        moved.insert(0, tail);

        let parent = block.parent();
        let mut next = BlockNode::new(block.tag(), parent);
        next.insert_runs_at(moved, 0);

        let next_id = match self.document.insert_block_after(next, block_id) {
            Ok(id) => id,
            Err(orphan) => {
                log::warn!("enter: block {} is not in the document", block_id);
                if let Some(block) = self.document.block_mut(block_id) {
                    let len = block.runs().len();
                    block.insert_runs_at(orphan.into_runs(), len);
                }
                return;
            }
        };

        if let Some(next) = self.document.block(next_id)
            && let Err(err) = self.renderer.create_node(
                next,
                &Locator::node(parent),
                Some(&Locator::node(block_id)),
            )
        {
            log::warn!("enter: {}", err);
        }
        if let Some(block) = self.document.block(block_id) {
            self.renderer.update_node(block);
        }

        log::debug!("enter: split {} into {}", block_id, next_id);
        self.cursor = Cursor::new(next_id, 0);
        self.restore_focus();
    }

    /// Delete backwards. At offset 0 the block merges into its previous sibling.
    pub fn backspace(&mut self) {
        let Some(block_id) = self.cursor.block else {
            return;
        };
        if self.cursor.offset == 0 {
            self.merge_into_previous(block_id);
            return;
        }

        let Some(block) = self.document.block_mut(block_id) else {
            return;
        };
        let Some(location) = block.locate(self.cursor.offset) else {
            return;
        };

        if location.local == 0 && location.index > 0 {
            block.merge_runs(location.index - 1, location.index);
        } else if block.runs()[location.index].is_empty() && block.runs().len() > 1 {
            block.remove_run(location.index);
        } else if let Some(run) = block.run_mut(location.index) {
            run.delete_char_before(location.local);
            let emptied = run.is_empty();
            // Deleting a run's last character drops the run unless it is the only one.
            if emptied && block.runs().len() > 1 {
                block.remove_run(location.index);
            }
        }

        self.cursor.offset -= 1;
        self.renderer.update_node(block);
        self.restore_focus();
    }

    fn merge_into_previous(&mut self, block_id: NodeId) {
        let Some(previous_id) = self.document.previous_sibling(block_id) else {
            log::debug!("backspace: {} has no previous block", block_id);
            return;
        };
        let Some(removed) = self.document.remove_block(block_id) else {
            return;
        };
        let Some(previous) = self.document.block_mut(previous_id) else {
            return;
        };

        let last = previous.runs().len() - 1;
        let absorbs_text = removed.runs().first().is_some_and(|run| !run.is_empty());
        // A trailing empty run vanishes into the text it absorbs; a lone placeholder keeps the
        // caret at the start of the block.
        let marker_vanishes =
            previous.runs()[last].is_empty() && (absorbs_text || previous.runs().len() == 1);
        let offset = previous.raw_len() - usize::from(marker_vanishes);

        let mut runs = removed.into_runs().into_iter();
        if let Some(first) = runs.next() {
            previous.insert_run(first, last + 1);
            previous.merge_runs(last, last + 1);
        }
        let len = previous.runs().len();
        previous.insert_runs_at(runs.collect(), len);

        self.renderer.delete_node(&block_id);
        self.renderer.update_node(previous);

        log::debug!("backspace: merged {} into {}", block_id, previous_id);
        self.cursor = Cursor::new(previous_id, offset);
        self.restore_focus();
    }

    /// Start an empty bold run at the cursor and move the cursor into it.
    pub fn apply_bold(&mut self) {
        let Some(block_id) = self.cursor.block else {
            return;
        };
        let Some(block) = self.document.block_mut(block_id) else {
            return;
        };
        let Some(location) = block.locate(self.cursor.offset) else {
            return;
        };

        let index = location.index;
        let run = &block.runs()[index];
        let run_len = run.len();
        let offset = if run.is_empty() && run.is_bold() {
            location.start + 1
        } else if run.is_empty() {
            if let Some(run) = block.run_mut(index) {
                run.set_bold(true);
            }
            location.start + 1
        } else if location.local == run_len {
            let reusable = block
                .runs()
                .get(index + 1)
                .is_some_and(|next| next.is_empty() && next.is_bold());
            if !reusable {
                block.insert_run(TextRun::empty_bold(), index + 1);
            }
            location.start + run_len + 1
        } else if location.local == 0 {
            block.insert_run(TextRun::empty_bold(), index);
            location.start + 1
        } else {
            let tail = block.split_run_at_offset(index, location.local);
            block.insert_run(TextRun::empty_bold(), index + 1);
            if let Some(tail) = tail {
                block.insert_run(tail, index + 2);
            }
            location.start + location.local + 1
        };

        self.cursor.offset = offset;
        self.renderer.update_node(block);
        self.restore_focus();
    }

    /// Retag the current block.
    pub fn set_block_tag(&mut self, tag: BlockTag) -> bool {
        let Some(block) = self
            .cursor
            .block
            .and_then(|id| self.document.block_mut(id))
        else {
            return false;
        };
        if block.tag() != tag {
            block.set_tag(tag);
            self.renderer.update_node(block);
        }
        self.restore_focus();
        true
    }

    /// Move the caret. Returns `false` (leaving the cursor alone) when the surface could not
    /// resolve a new position.
    pub fn move_cursor(&mut self, direction: CaretDirection) -> bool {
        let Some(block) = self.cursor.block else {
            return false;
        };
        match self.caret.move_cursor(block, self.cursor.offset, direction) {
            Some(position) => self.adopt(position),
            None => {
                log::debug!("move_cursor {:?}: no position", direction);
                false
            }
        }
    }

    /// Place the caret under a point.
    pub fn place_at_point(&mut self, x: f32, y: f32) -> bool {
        match self.caret.set_cursor_from_point(x, y) {
            Some(position) => self.adopt(position),
            None => false,
        }
    }

    fn adopt(&mut self, position: CaretPosition) -> bool {
        let Some(block) = self.document.block(position.block_id) else {
            log::debug!("caret landed outside any block: {:?}", position);
            return false;
        };
        let offset = block.offset_of(position.leaf_index, position.offset);
        log::trace!("caret -> {}@{}", position.block_id, offset);
        self.cursor = Cursor::new(position.block_id, offset);
        true
    }
}
