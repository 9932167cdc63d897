//! Node identity and selection types.

use derive_more::{Display, From, Into};
use uuid::Uuid;

/// Identity of one document node.
///
/// Node ids are stable for the lifetime of a node, including its stay in
/// the removed-content holding area, but a replaced node gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a fresh node id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A position inside a node's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Node the position is anchored to.
    pub node: NodeId,
    /// Offset within the node's children.
    pub offset: usize,
}

/// A contiguous range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// Start of the range.
    pub start: Position,
    /// End of the range.
    pub end: Position,
}

impl SelectionRange {
    /// A collapsed range at the given position.
    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

/// A captured document selection.
///
/// Selections are opaque to the session: they are captured before a
/// replacement transaction and restored verbatim afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Ranges making up the selection, in document order.
    pub ranges: Vec<SelectionRange>,
}

impl Selection {
    /// A selection over the given ranges.
    pub fn new(ranges: Vec<SelectionRange>) -> Self {
        Self { ranges }
    }

    /// Returns `true` if the selection holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
