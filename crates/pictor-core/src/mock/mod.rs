//! Mock implementations of the document, view, and notification seams.
//!
//! This module provides in-memory stand-ins for every external collaborator
//! the processing session depends on. They are useful for unit and
//! integration testing and make no attempt to model a real editor beyond
//! what the seams require.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! pictor-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::asset::{
    AssetId, AssetMetadata, AssetRecord, ProcessingStatus, ProvideAssetStatus,
    ReplacementAttributes,
};
use crate::document::{
    DocumentChange, DocumentModel, DocumentWriter, NodeId, Position, Selection, SelectionRange,
};
use crate::error::{Error, Result};
use crate::notify::{Notifier, PendingAction, PendingActions};
use crate::view::EditingView;

/// Builds an asset record pointing at a deterministic test URL.
pub fn asset_record(
    id: impl Into<AssetId>,
    width: u64,
    height: u64,
    status: Option<ProcessingStatus>,
) -> AssetRecord {
    let id = id.into();
    let url = format!("https://assets.example.com/{}", id.as_str())
        .parse()
        .expect("valid test url");

    AssetRecord {
        id,
        url,
        sources: Vec::new(),
        metadata: AssetMetadata {
            width,
            height,
            blurhash: None,
            metadata_processing_status: status,
        },
        updated_at: None,
    }
}

/// One node of the mock document tree.
#[derive(Debug, Clone)]
struct MockNode {
    kind: String,
    attributes: BTreeMap<String, Value>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Mutable document state guarded by the document lock.
#[derive(Debug)]
struct DocState {
    nodes: HashMap<NodeId, MockNode>,
    root: NodeId,
    graveyard: HashSet<NodeId>,
    selection: Selection,
    transactions: u64,
}

impl DocState {
    fn is_live(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node) && !self.graveyard.contains(&node)
    }

    fn resolve_asset(&self, asset_id: &AssetId) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, node)| {
            let matches = !self.graveyard.contains(id)
                && node
                    .attributes
                    .get(ReplacementAttributes::ASSET_ID_KEY)
                    .and_then(Value::as_str)
                    == Some(asset_id.as_str());
            matches.then_some(*id)
        })
    }
}

/// In-memory document implementing the [`DocumentModel`] seam.
///
/// Nodes live in a single tree under an implicit root; removed nodes move
/// to a graveyard set where they keep their data, mirroring the holding
/// area of a real document model. Every [`change`](DocumentModel::change)
/// call increments a transaction counter so tests can assert atomicity.
#[derive(Debug)]
pub struct MockDocument {
    state: Mutex<DocState>,
    changes: broadcast::Sender<DocumentChange>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// Creates an empty document with a fresh root node.
    pub fn new() -> Self {
        let root = NodeId::generate();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            MockNode {
                kind: "$root".to_owned(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
                parent: None,
            },
        );

        let (changes, _) = broadcast::channel(64);

        Self {
            state: Mutex::new(DocState {
                nodes,
                root,
                graveyard: HashSet::new(),
                selection: Selection::default(),
                transactions: 0,
            }),
            changes,
        }
    }

    /// Returns the root node id.
    pub fn root(&self) -> NodeId {
        self.state.lock().expect("document lock").root
    }

    /// Inserts a node under `parent` and returns its id.
    pub fn insert_node(
        &self,
        parent: NodeId,
        kind: impl Into<String>,
        attributes: &[(String, Value)],
    ) -> NodeId {
        let node = NodeId::generate();
        {
            let mut state = self.state.lock().expect("document lock");
            state.nodes.insert(
                node,
                MockNode {
                    kind: kind.into(),
                    attributes: attributes.iter().cloned().collect(),
                    children: Vec::new(),
                    parent: Some(parent),
                },
            );
            if let Some(parent_node) = state.nodes.get_mut(&parent) {
                parent_node.children.push(node);
            }
        }
        let _ = self.changes.send(DocumentChange::NodeInserted { node });
        node
    }

    /// Inserts an image node stamped with an asset id under the root.
    pub fn insert_image(&self, asset_id: &AssetId, width: u64, height: u64) -> NodeId {
        let root = self.root();
        self.insert_node(
            root,
            "imageBlock",
            &[
                (
                    ReplacementAttributes::ASSET_ID_KEY.to_owned(),
                    json!(asset_id.as_str()),
                ),
                ("width".to_owned(), json!(width)),
                ("height".to_owned(), json!(height)),
            ],
        )
    }

    /// Moves a node to the holding area, as a deletion would.
    pub fn remove_node(&self, node: NodeId) {
        {
            let mut state = self.state.lock().expect("document lock");
            let parent = state.nodes.get(&node).and_then(|n| n.parent);
            if let Some(parent) = parent
                && let Some(parent_node) = state.nodes.get_mut(&parent)
            {
                parent_node.children.retain(|child| *child != node);
            }
            state.graveyard.insert(node);
        }
        let _ = self.changes.send(DocumentChange::NodeRemoved { node });
    }

    /// Reads an attribute of a node, live or held.
    pub fn attribute(&self, node: NodeId, key: &str) -> Option<Value> {
        let state = self.state.lock().expect("document lock");
        state.nodes.get(&node)?.attributes.get(key).cloned()
    }

    /// Returns the kind of a node.
    pub fn kind(&self, node: NodeId) -> Option<String> {
        let state = self.state.lock().expect("document lock");
        state.nodes.get(&node).map(|n| n.kind.clone())
    }

    /// Returns the children of a node in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let state = self.state.lock().expect("document lock");
        state
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if the node exists in the live tree.
    pub fn exists(&self, node: NodeId) -> bool {
        self.state.lock().expect("document lock").is_live(node)
    }

    /// Number of committed transactions.
    pub fn transaction_count(&self) -> u64 {
        self.state.lock().expect("document lock").transactions
    }

    /// Returns the current selection.
    pub fn selection(&self) -> Selection {
        self.state.lock().expect("document lock").selection.clone()
    }

    /// Replaces the current selection.
    pub fn set_selection(&self, selection: Selection) {
        self.state.lock().expect("document lock").selection = selection;
    }

    /// Collapses the selection at offset zero of the given node.
    pub fn select_at(&self, node: NodeId) {
        self.set_selection(Selection::new(vec![SelectionRange::collapsed(Position {
            node,
            offset: 0,
        })]));
    }
}

impl DocumentModel for MockDocument {
    fn change(&self, f: &mut dyn FnMut(&mut dyn DocumentWriter)) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock().expect("document lock");
            state.transactions += 1;
            let mut writer = MockWriter {
                state: &mut *state,
                events: &mut events,
            };
            f(&mut writer);
        }
        for event in events {
            let _ = self.changes.send(event);
        }
    }

    fn resolve_asset_node(&self, asset_id: &AssetId) -> Option<NodeId> {
        self.state
            .lock()
            .expect("document lock")
            .resolve_asset(asset_id)
    }

    fn asset_id_of(&self, node: NodeId) -> Option<AssetId> {
        let state = self.state.lock().expect("document lock");
        if !state.is_live(node) {
            return None;
        }
        state
            .nodes
            .get(&node)?
            .attributes
            .get(ReplacementAttributes::ASSET_ID_KEY)
            .and_then(Value::as_str)
            .map(AssetId::from)
    }

    fn in_graveyard(&self, node: NodeId) -> bool {
        self.state
            .lock()
            .expect("document lock")
            .graveyard
            .contains(&node)
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.changes.subscribe()
    }
}

/// Writer handed to [`MockDocument::change`] closures.
struct MockWriter<'a> {
    state: &'a mut DocState,
    events: &'a mut Vec<DocumentChange>,
}

impl DocumentWriter for MockWriter<'_> {
    fn selection(&self) -> Selection {
        self.state.selection.clone()
    }

    fn set_selection(&mut self, selection: &Selection) {
        self.state.selection = selection.clone();
    }

    fn select_node(&mut self, node: NodeId) {
        self.state.selection =
            Selection::new(vec![SelectionRange::collapsed(Position { node, offset: 0 })]);
    }

    fn resolve_asset_node(&self, asset_id: &AssetId) -> Option<NodeId> {
        self.state.resolve_asset(asset_id)
    }

    fn node_exists(&self, node: NodeId) -> bool {
        self.state.is_live(node)
    }

    fn insert_like(&mut self, reference: NodeId, attributes: &[(String, Value)]) -> NodeId {
        let (kind, parent) = self
            .state
            .nodes
            .get(&reference)
            .map(|n| (n.kind.clone(), n.parent))
            .unwrap_or_else(|| ("imageBlock".to_owned(), None));
        let parent = parent.unwrap_or(self.state.root);

        let node = NodeId::generate();
        self.state.nodes.insert(
            node,
            MockNode {
                kind,
                attributes: attributes.iter().cloned().collect(),
                children: Vec::new(),
                parent: Some(parent),
            },
        );

        // Insertion over a selected node replaces it: the reference slides
        // into the holding area and the new node takes its position.
        if let Some(parent_node) = self.state.nodes.get_mut(&parent) {
            if let Some(position) = parent_node.children.iter().position(|c| *c == reference) {
                parent_node.children[position] = node;
            } else {
                parent_node.children.push(node);
            }
        }
        if self.state.nodes.contains_key(&reference) {
            self.state.graveyard.insert(reference);
            self.events
                .push(DocumentChange::NodeRemoved { node: reference });
        }
        self.events.push(DocumentChange::NodeInserted { node });

        node
    }

    fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = self
            .state
            .nodes
            .get_mut(&from)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();

        for child in &children {
            if let Some(child_node) = self.state.nodes.get_mut(child) {
                child_node.parent = Some(to);
            }
        }
        if let Some(to_node) = self.state.nodes.get_mut(&to) {
            to_node.children.extend(children);
        }
    }

    fn set_attribute(&mut self, node: NodeId, key: &str, value: Value) {
        if let Some(n) = self.state.nodes.get_mut(&node) {
            n.attributes.insert(key.to_owned(), value);
            self.events.push(DocumentChange::AttributeChanged {
                node,
                key: key.to_owned(),
            });
        }
    }
}

/// Editing view recording indicator and focus calls.
#[derive(Debug, Default)]
pub struct MockView {
    processing: Mutex<HashMap<NodeId, (u64, u64)>>,
    refreshed: Mutex<Vec<NodeId>>,
    focus_calls: AtomicUsize,
}

impl MockView {
    /// Returns `true` while the node carries the processing indicator.
    pub fn is_processing(&self, node: NodeId) -> bool {
        self.processing
            .lock()
            .expect("view lock")
            .contains_key(&node)
    }

    /// Dimensions applied with the processing indicator, if any.
    pub fn processing_dimensions(&self, node: NodeId) -> Option<(u64, u64)> {
        self.processing
            .lock()
            .expect("view lock")
            .get(&node)
            .copied()
    }

    /// Number of re-renders forced on the node.
    pub fn refresh_count(&self, node: NodeId) -> usize {
        self.refreshed
            .lock()
            .expect("view lock")
            .iter()
            .filter(|n| **n == node)
            .count()
    }

    /// Number of focus restorations.
    pub fn focus_count(&self) -> usize {
        self.focus_calls.load(Ordering::SeqCst)
    }
}

impl EditingView for MockView {
    fn mark_processing(&self, node: NodeId, width: u64, height: u64) {
        self.processing
            .lock()
            .expect("view lock")
            .insert(node, (width, height));
    }

    fn refresh(&self, node: NodeId) {
        self.processing.lock().expect("view lock").remove(&node);
        self.refreshed.lock().expect("view lock").push(node);
    }

    fn focus(&self) {
        self.focus_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier collecting warnings.
#[derive(Debug, Default)]
pub struct MockNotifier {
    warnings: Mutex<Vec<String>>,
}

impl MockNotifier {
    /// Warnings shown so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("notifier lock").clone()
    }

    /// Number of warnings shown so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.lock().expect("notifier lock").len()
    }
}

impl Notifier for MockNotifier {
    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .expect("notifier lock")
            .push(message.to_owned());
    }
}

/// Pending-action registry counting active actions.
#[derive(Debug, Default)]
pub struct MockPendingActions {
    active: Arc<AtomicUsize>,
    labels: Mutex<Vec<String>>,
}

impl MockPendingActions {
    /// Number of currently registered actions.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Labels of every action ever registered.
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().expect("pending lock").clone()
    }
}

impl PendingActions for MockPendingActions {
    fn register(&self, label: &str) -> PendingAction {
        self.labels
            .lock()
            .expect("pending lock")
            .push(label.to_owned());
        self.active.fetch_add(1, Ordering::SeqCst);

        let active = Arc::clone(&self.active);
        PendingAction::new(move || {
            active.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

/// Status provider replaying a scripted sequence of results.
///
/// Once the script is exhausted every further call reports the asset as
/// still queued, so an `always queued` provider is simply an empty script.
#[derive(Debug, Default)]
pub struct ScriptedStatusProvider {
    script: Mutex<VecDeque<Result<AssetRecord>>>,
    calls: AtomicU32,
}

impl ScriptedStatusProvider {
    /// Creates a provider replaying the given steps in order.
    pub fn new(steps: Vec<Result<AssetRecord>>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            calls: AtomicU32::new(0),
        }
    }

    /// A provider reporting `queued` for `queued` calls, then success.
    pub fn queued_then_success(queued: usize, record: AssetRecord) -> Self {
        let mut steps: Vec<Result<AssetRecord>> =
            (0..queued).map(|_| Err(Error::not_ready())).collect();
        steps.push(Ok(record));
        Self::new(steps)
    }

    /// A provider that never reports the asset as ready.
    pub fn always_queued() -> Self {
        Self::default()
    }

    /// Number of status requests issued so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProvideAssetStatus for ScriptedStatusProvider {
    async fn asset_status(
        &self,
        _asset_id: &AssetId,
        cancel: &CancellationToken,
    ) -> Result<AssetRecord> {
        if cancel.is_cancelled() {
            return Err(Error::cancelled());
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(Error::not_ready()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let doc = MockDocument::new();
        let asset_id = AssetId::new("img-1");
        let node = doc.insert_image(&asset_id, 200, 100);

        assert!(doc.exists(node));
        assert_eq!(doc.resolve_asset_node(&asset_id), Some(node));

        doc.remove_node(node);
        assert!(!doc.exists(node));
        assert!(doc.in_graveyard(node));
        assert_eq!(doc.resolve_asset_node(&asset_id), None);
    }

    #[test]
    fn test_change_is_one_transaction() {
        let doc = MockDocument::new();
        let asset_id = AssetId::new("img-1");
        let node = doc.insert_image(&asset_id, 200, 100);
        assert_eq!(doc.transaction_count(), 0);

        doc.change(&mut |writer| {
            writer.select_node(node);
            writer.set_attribute(node, "width", json!(400));
        });
        assert_eq!(doc.transaction_count(), 1);
        assert_eq!(doc.attribute(node, "width"), Some(json!(400)));
    }

    #[test]
    fn test_insert_like_replaces_reference() {
        let doc = MockDocument::new();
        let asset_id = AssetId::new("img-1");
        let node = doc.insert_image(&asset_id, 200, 100);
        let caption = doc.insert_node(node, "caption", &[]);

        let mut replacement = None;
        doc.change(&mut |writer| {
            writer.select_node(node);
            let new_node = writer.insert_like(node, &[("width".to_owned(), json!(400))]);
            writer.move_children(node, new_node);
            replacement = Some(new_node);
        });

        let replacement = replacement.expect("replacement inserted");
        assert!(doc.exists(replacement));
        assert!(doc.in_graveyard(node));
        assert_eq!(doc.kind(replacement).as_deref(), Some("imageBlock"));
        assert_eq!(doc.children(replacement), vec![caption]);
        assert_eq!(doc.children(doc.root()), vec![replacement]);
    }

    #[test]
    fn test_change_feed_reports_removal() {
        let doc = MockDocument::new();
        let asset_id = AssetId::new("img-1");
        let node = doc.insert_image(&asset_id, 200, 100);

        let mut feed = doc.subscribe();
        doc.remove_node(node);

        assert_eq!(
            feed.try_recv().expect("change delivered"),
            DocumentChange::NodeRemoved { node }
        );
    }

    #[tokio::test]
    async fn test_scripted_provider_respects_cancellation() {
        let provider =
            ScriptedStatusProvider::queued_then_success(0, asset_record("img-1", 400, 200, None));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = provider
            .asset_status(&AssetId::new("img-1"), &cancel)
            .await
            .expect_err("cancelled");
        assert!(result.is_cancelled());
        assert_eq!(provider.calls(), 0);
    }
}
