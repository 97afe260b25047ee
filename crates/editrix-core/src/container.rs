//! The container node at the root of a document.

use crate::id::NodeId;
use crate::render::{Attributes, NODE_ID_ATTRIBUTE};

/// Tag of the root container element.
pub const ROOT_CONTAINER_TAG: &str = "article";

/// Ordered list of block ids. Child order is document order.
#[derive(Debug, Clone)]
pub struct ContainerNode {
    id: NodeId,
    tag: String,
    children: Vec<NodeId>,
    attributes: Attributes,
    parent: Option<NodeId>,
}

impl ContainerNode {
    /// Create a container with the given element tag.
    pub fn new(tag: &str, parent: Option<NodeId>) -> Self {
        let id = NodeId::next();
        let mut attributes = Attributes::new();
        attributes.insert(NODE_ID_ATTRIBUTE.to_string(), id.to_string());
        Self {
            id,
            tag: tag.to_string(),
            children: Vec::new(),
            attributes,
            parent,
        }
    }

    /// Container id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Element tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Owning container, if nested.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Rendering attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position of `id` among the children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.children.iter().position(|child| *child == id)
    }

    /// Append a child at the end.
    pub fn append_child(&mut self, id: NodeId) {
        self.children.push(id);
    }

    /// Insert `id` right after `reference`. Returns `false` (and inserts nothing) when
    /// `reference` is not a child.
    pub fn insert_child_after(&mut self, id: NodeId, reference: NodeId) -> bool {
        match self.index_of(reference) {
            Some(index) => {
                self.children.insert(index + 1, id);
                true
            }
            None => false,
        }
    }

    /// Remove `id` from the children. Returns `false` when it is not a child.
    pub fn remove_child(&mut self, id: NodeId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Child right before `id`.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let index = self.index_of(id)?;
        index.checked_sub(1).map(|prev| self.children[prev])
    }
}
