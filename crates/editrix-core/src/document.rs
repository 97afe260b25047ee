//! Document arena.
//!
//! The document owns the single root [`ContainerNode`] and every [`BlockNode`], keyed by id.
//! Blocks point at their container by id and the container lists its blocks by id, so there
//! are no reference cycles and parent lookup stays O(1).

use std::collections::HashMap;

use crate::block::{BlockNode, BlockTag};
use crate::container::{ContainerNode, ROOT_CONTAINER_TAG};
use crate::id::NodeId;

/// A container with its blocks.
#[derive(Debug, Clone)]
pub struct Document {
    root: ContainerNode,
    blocks: HashMap<NodeId, BlockNode>,
}

impl Document {
    /// Create a document holding one empty block of `initial` tag.
    pub fn new(initial: BlockTag) -> Self {
        let mut root = ContainerNode::new(ROOT_CONTAINER_TAG, None);
        let block = BlockNode::new(initial, root.id());
        root.append_child(block.id());
        let mut blocks = HashMap::new();
        blocks.insert(block.id(), block);
        Self { root, blocks }
    }

    /// Root container.
    pub fn root(&self) -> &ContainerNode {
        &self.root
    }

    /// Block by id.
    pub fn block(&self, id: NodeId) -> Option<&BlockNode> {
        self.blocks.get(&id)
    }

    /// Mutable block by id.
    pub fn block_mut(&mut self, id: NodeId) -> Option<&mut BlockNode> {
        self.blocks.get_mut(&id)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.root.children().len()
    }

    /// Whether the document has no blocks. Never true for documents built with [`Document::new`]
    /// unless every block was removed by hand.
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// First block in document order.
    pub fn first_block(&self) -> Option<NodeId> {
        self.root.children().first().copied()
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockNode> + '_ {
        self.root
            .children()
            .iter()
            .filter_map(|id| self.blocks.get(id))
    }

    /// Logical text of every block, in document order.
    pub fn texts(&self) -> Vec<String> {
        self.blocks().map(BlockNode::text_content).collect()
    }

    /// Block right before `id`.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.root.previous_sibling(id)
    }

    /// Insert `block` right after `reference`. Gives the block back when `reference` is not in
    /// the document.
    pub fn insert_block_after(
        &mut self,
        block: BlockNode,
        reference: NodeId,
    ) -> Result<NodeId, BlockNode> {
        let id = block.id();
        if !self.root.insert_child_after(id, reference) {
            return Err(block);
        }
        self.blocks.insert(id, block);
        Ok(id)
    }

    /// Detach a block from the document.
    pub fn remove_block(&mut self, id: NodeId) -> Option<BlockNode> {
        if !self.root.remove_child(id) {
            return None;
        }
        self.blocks.remove(&id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(BlockTag::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_placeholder_block() {
        let document = Document::new(BlockTag::Heading1);
        assert_eq!(document.len(), 1);
        let first = document.first_block().unwrap();
        let block = document.block(first).unwrap();
        assert_eq!(block.tag(), BlockTag::Heading1);
        assert_eq!(block.parent(), document.root().id());
        assert!(block.is_placeholder());
        assert_eq!(document.root().tag(), "article");
    }

    #[test]
    fn test_insert_and_remove_blocks() {
        let mut document = Document::default();
        let first = document.first_block().unwrap();
        let block = BlockNode::new(BlockTag::Paragraph, document.root().id());
        let second = document.insert_block_after(block, first).unwrap();
        assert_eq!(document.root().children(), &[first, second]);
        assert_eq!(document.previous_sibling(second), Some(first));

        let orphan = BlockNode::new(BlockTag::Paragraph, document.root().id());
        assert!(document.insert_block_after(orphan, NodeId::next()).is_err());

        assert!(document.remove_block(first).is_some());
        assert!(document.block(first).is_none());
        assert!(document.remove_block(first).is_none());
        assert_eq!(document.len(), 1);
    }
}
