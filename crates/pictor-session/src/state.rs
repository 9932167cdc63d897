//! In-flight processing state and the active set.

use std::collections::HashMap;
use std::sync::Mutex;

use pictor_core::{AssetId, NodeId};
use tokio_util::sync::CancellationToken;

/// State of one in-flight edit.
///
/// The target node is held by identity, not by reference; the live node is
/// re-resolved through the document at each mutation point because the
/// tree may have replaced it since the state was created.
#[derive(Debug, Clone)]
pub(crate) struct ProcessingState {
    pub asset_id: AssetId,
    pub target_node: NodeId,
    pub cancel: CancellationToken,
}

/// Active in-flight edits, keyed by asset id.
///
/// At most one entry exists per asset id; entries are removed exactly once,
/// on the terminal outcome of their poll task.
#[derive(Debug, Default)]
pub(crate) struct ActiveSet {
    entries: Mutex<HashMap<AssetId, ProcessingState>>,
}

impl ActiveSet {
    /// Registers a state unless its asset id is already in flight.
    ///
    /// Returns `false` (and drops the state) when an entry for the asset id
    /// already exists.
    pub fn insert_if_absent(&self, state: ProcessingState) -> bool {
        let mut entries = self.entries.lock().expect("active set lock");
        if entries.contains_key(&state.asset_id) {
            return false;
        }
        entries.insert(state.asset_id.clone(), state);
        true
    }

    /// Removes and returns the entry for an asset id.
    pub fn remove(&self, asset_id: &AssetId) -> Option<ProcessingState> {
        self.entries
            .lock()
            .expect("active set lock")
            .remove(asset_id)
    }

    /// Returns `true` while the asset id has an in-flight entry.
    pub fn contains(&self, asset_id: &AssetId) -> bool {
        self.entries
            .lock()
            .expect("active set lock")
            .contains_key(asset_id)
    }

    /// Returns `true` if any entry targets the given node.
    pub fn targets_node(&self, node: NodeId) -> bool {
        self.entries
            .lock()
            .expect("active set lock")
            .values()
            .any(|state| state.target_node == node)
    }

    /// Number of in-flight entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("active set lock").len()
    }

    /// Signals cancellation for every entry whose target node satisfies the
    /// predicate. Entries stay in the set; their poll tasks remove them on
    /// the terminal outcome.
    pub fn cancel_where(&self, mut deleted: impl FnMut(NodeId) -> bool) {
        let entries = self.entries.lock().expect("active set lock");
        for state in entries.values() {
            if deleted(state.target_node) {
                state.cancel.cancel();
            }
        }
    }

    /// Signals cancellation for every entry.
    pub fn cancel_all(&self) {
        let entries = self.entries.lock().expect("active set lock");
        for state in entries.values() {
            state.cancel.cancel();
        }
    }
}
