//! Renderer contract.
//!
//! A renderer paints the document into a visual surface. The core never reads the surface
//! through this trait; it only pushes tree changes (see [`crate::caret::Surface`] for the read
//! side).

use std::collections::BTreeMap;
use std::fmt;

use crate::block::BlockNode;
use crate::document::Document;
use crate::id::NodeId;

/// Reserved attribute carrying a node's id on its rendered element.
pub const NODE_ID_ATTRIBUTE: &str = "data-editrix-id";

/// Attribute marking a block element as editable.
pub const CONTENT_EDITABLE_ATTRIBUTE: &str = "contenteditable";

/// Tag of the rendered inline wrapper around bold runs.
pub const BOLD_TAG: &str = "strong";

/// Rendering attributes of a node, ordered by name.
pub type Attributes = BTreeMap<String, String>;

/// Selector addressing a rendered element by its identity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator(NodeId);

impl Locator {
    /// Locator for the element rendered for `id`.
    pub fn node(id: NodeId) -> Self {
        Self(id)
    }

    /// Node id this locator resolves.
    pub fn node_id(&self) -> NodeId {
        self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}=\"{}\"]", NODE_ID_ATTRIBUTE, self.0)
    }
}

/// Errors reported by renderers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The parent locator did not resolve to an element.
    #[error("parent element not found with selector: {0}")]
    ParentNotFound(Locator),
    /// A sibling locator was given but did not resolve to an element.
    #[error("sibling element not found with selector: {0}")]
    SiblingNotFound(Locator),
    /// The renderer has no surface to mount into.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

/// Paints document state into a surface.
pub trait Renderer {
    /// Render the whole document, replacing whatever was mounted before.
    fn mount(&mut self, document: &Document) -> Result<(), RenderError>;

    /// Render a new block under `parent`, right after `sibling`, or first when there is no
    /// sibling.
    fn create_node(
        &mut self,
        block: &BlockNode,
        parent: &Locator,
        sibling: Option<&Locator>,
    ) -> Result<(), RenderError>;

    /// Re-render an existing block. Does nothing when the block is not rendered.
    fn update_node(&mut self, block: &BlockNode);

    /// Remove a rendered block. Does nothing when it is absent.
    fn delete_node(&mut self, id: &NodeId);
}
