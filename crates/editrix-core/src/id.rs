//! Opaque node identity.
//!
//! Every run, block and container carries a [`NodeId`]. Ids are allocated from a process-wide
//! counter, so they are unique across every live document and stable for the node's lifetime.
//! The rendered surface stores the id's string form in the identity attribute, which is the
//! only way a surface hit is mapped back to a logical node.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::block::NodeError;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

const NODE_ID_PREFIX: &str = "ed";

/// Opaque identifier of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (mainly for diagnostics).
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:x}", NODE_ID_PREFIX, self.0)
    }
}

impl FromStr for NodeId {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(NODE_ID_PREFIX)
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .map(Self)
            .ok_or_else(|| NodeError::InvalidNodeId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = NodeId::next();
        let b = NodeId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let id = NodeId::next();
        let parsed: NodeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_from_str_rejects_foreign_values() {
        assert!(matches!(
            "p-12".parse::<NodeId>(),
            Err(NodeError::InvalidNodeId(_))
        ));
        assert!("ed".parse::<NodeId>().is_err());
        assert!("edzz".parse::<NodeId>().is_err());
    }
}
