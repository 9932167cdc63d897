//! Document change feed entries.

use super::NodeId;

/// One entry of the document change feed.
///
/// The feed is the differ's view of a committed transaction. Removal means
/// the node was moved to the removed-content holding area; it may still be
/// restored by undo, so listeners must treat removal as potentially
/// transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    /// A node was inserted into the live tree.
    NodeInserted {
        /// The inserted node.
        node: NodeId,
    },
    /// A node was moved from the live tree to the holding area.
    NodeRemoved {
        /// The removed node.
        node: NodeId,
    },
    /// An attribute changed on a live node.
    AttributeChanged {
        /// The affected node.
        node: NodeId,
        /// The attribute key.
        key: String,
    },
}
