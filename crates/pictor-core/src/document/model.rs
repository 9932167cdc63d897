//! Document model and writer traits.

use serde_json::Value;
use tokio::sync::broadcast;

use super::{DocumentChange, NodeId, Selection};
use crate::asset::AssetId;

/// Read access and transaction entry point of the host document.
///
/// All mutation happens inside [`change`](DocumentModel::change); a single
/// call is one atomic transaction, observed by the change feed and the undo
/// history as one coherent step.
pub trait DocumentModel: Send + Sync + 'static {
    /// Runs `f` inside a single document transaction.
    fn change(&self, f: &mut dyn FnMut(&mut dyn DocumentWriter));

    /// Resolves the live node carrying the given asset id attribute.
    ///
    /// Returns `None` when no live node carries the id, including when the
    /// node was moved to the holding area.
    fn resolve_asset_node(&self, asset_id: &AssetId) -> Option<NodeId>;

    /// Returns the asset id attribute of a live node, if it carries one.
    fn asset_id_of(&self, node: NodeId) -> Option<AssetId>;

    /// Returns `true` if the node resides in the removed-content holding
    /// area.
    fn in_graveyard(&self, node: NodeId) -> bool;

    /// Subscribes to the change feed.
    ///
    /// Entries are delivered after the transaction that produced them has
    /// committed.
    fn subscribe(&self) -> broadcast::Receiver<DocumentChange>;
}

/// Mutation surface available inside a document transaction.
pub trait DocumentWriter {
    /// Returns the current selection.
    fn selection(&self) -> Selection;

    /// Restores a previously captured selection.
    fn set_selection(&mut self, selection: &Selection);

    /// Collapses the selection onto the given node.
    fn select_node(&mut self, node: NodeId);

    /// Resolves the live node carrying the given asset id attribute.
    fn resolve_asset_node(&self, asset_id: &AssetId) -> Option<NodeId>;

    /// Returns `true` if the node exists in the live tree.
    fn node_exists(&self, node: NodeId) -> bool;

    /// Inserts a new node of the same kind as `reference` over the current
    /// selection, replacing the selected content, and returns its id.
    fn insert_like(&mut self, reference: NodeId, attributes: &[(String, Value)]) -> NodeId;

    /// Moves all children of `from` onto `to`, preserving order.
    ///
    /// `from` may already reside in the holding area.
    fn move_children(&mut self, from: NodeId, to: NodeId);

    /// Sets an attribute on a node.
    fn set_attribute(&mut self, node: NodeId, key: &str, value: Value);
}
