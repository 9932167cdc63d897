//! The asset processing session.

use std::sync::{Arc, Mutex};

use pictor_core::{
    AssetId, AssetRecord, DocumentModel, EditingView, NodeId, Notifier, PendingActions,
    ProvideAssetStatus, ReplacementAttributes,
};
use serde_json::json;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::TRACING_TARGET_SESSION;
use crate::dialog::{DialogHandle, DialogLauncher, DialogOptions};
use crate::error::Error;
use crate::poll::poll_until_processed;
use crate::retry::RetryPolicy;
use crate::state::{ActiveSet, ProcessingState};

/// Generic warning shown for any surfaced processing failure.
///
/// The user-facing message does not distinguish retry exhaustion from an
/// unexpected transport error; logs do.
const PROCESSING_FAILED_WARNING: &str = "Image editing could not be completed. Please try again.";

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Endpoint the external dialog obtains its authorization token from.
    pub token_url: Option<Url>,
    /// Overwrite policy passed to the dialog. Defaults to `false`: an edit
    /// produces a new rendition of the asset.
    pub allow_overwrite: bool,
    /// Retry policy of the status poll loop.
    pub retry: RetryPolicy,
    /// User-visible label of the registered pending action.
    pub pending_label: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_url: None,
            allow_overwrite: false,
            retry: RetryPolicy::default(),
            pending_label: "Processing image edit".to_owned(),
        }
    }
}

impl SessionConfig {
    /// Set the token endpoint passed to the dialog.
    pub fn with_token_url(mut self, token_url: Url) -> Self {
        self.token_url = Some(token_url);
        self
    }

    /// Set the retry policy of the poll loop.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the pending-action label.
    pub fn with_pending_label(mut self, label: impl Into<String>) -> Self {
        self.pending_label = label.into();
        self
    }
}

/// Owns the end-to-end lifecycle of editing assets through the external
/// dialog.
///
/// The session tracks every in-flight edit keyed by asset id, polls the
/// status provider until the edited asset is ready, cancels in-flight work
/// when the target node is deleted or the session is destroyed, and swaps
/// the document node in a single transaction on success.
///
/// The session is cheap to clone; clones share all state. Constructing it
/// requires a Tokio runtime: a watcher task subscribed to the document
/// change feed runs until [`destroy`](Self::destroy).
pub struct AssetProcessingSession<P, D, V, L, N, A> {
    inner: Arc<Inner<P, D, V, L, N, A>>,
}

impl<P, D, V, L, N, A> Clone for AssetProcessingSession<P, D, V, L, N, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P, D, V, L, N, A> {
    provider: Arc<P>,
    document: Arc<D>,
    view: Arc<V>,
    dialogs: Arc<L>,
    notifier: Arc<N>,
    pending: Arc<A>,
    config: SessionConfig,
    active: ActiveSet,
    dialog: Mutex<Option<DialogHandle>>,
    shutdown: CancellationToken,
    processing_tx: watch::Sender<usize>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl<P, D, V, L, N, A> AssetProcessingSession<P, D, V, L, N, A>
where
    P: ProvideAssetStatus + 'static,
    D: DocumentModel,
    V: EditingView,
    L: DialogLauncher,
    N: Notifier,
    A: PendingActions,
{
    /// Creates a session over the given collaborators.
    pub fn new(
        provider: Arc<P>,
        document: Arc<D>,
        view: Arc<V>,
        dialogs: Arc<L>,
        notifier: Arc<N>,
        pending: Arc<A>,
        config: SessionConfig,
    ) -> Self {
        let (processing_tx, _) = watch::channel(0);

        let inner = Arc::new(Inner {
            provider,
            document,
            view,
            dialogs,
            notifier,
            pending,
            config,
            active: ActiveSet::default(),
            dialog: Mutex::new(None),
            shutdown: CancellationToken::new(),
            processing_tx,
            watcher: Mutex::new(None),
        });

        let watcher = Inner::spawn_watcher(&inner);
        *inner.watcher.lock().expect("watcher lock") = Some(watcher);

        Self { inner }
    }

    /// Opens the external editing dialog for a node.
    ///
    /// A no-op when the dialog is already open, when the node carries no
    /// asset id attribute, or when the node is already being processed.
    pub fn open_editor(&self, target: NodeId) {
        let inner = &self.inner;
        let mut dialog = inner.dialog.lock().expect("dialog lock");
        if dialog.is_some() {
            tracing::debug!(
                target: TRACING_TARGET_SESSION,
                "Editor already open"
            );
            return;
        }

        let Some(asset_id) = inner.document.asset_id_of(target) else {
            tracing::debug!(
                target: TRACING_TARGET_SESSION,
                node = %target,
                "Node carries no asset id, not opening editor"
            );
            return;
        };

        if inner.active.targets_node(target) {
            tracing::debug!(
                target: TRACING_TARGET_SESSION,
                asset_id = %asset_id,
                "Node already being processed, not opening editor"
            );
            return;
        }

        tracing::debug!(
            target: TRACING_TARGET_SESSION,
            asset_id = %asset_id,
            "Opening editing dialog"
        );

        *dialog = Some(inner.dialogs.mount(DialogOptions {
            asset_id,
            allow_overwrite: inner.config.allow_overwrite,
            token_url: inner.config.token_url.clone(),
        }));
    }

    /// Returns `true` while the dialog is mounted.
    pub fn is_open(&self) -> bool {
        self.inner.dialog.lock().expect("dialog lock").is_some()
    }

    /// Tears down the dialog mount point and restores focus to the editing
    /// surface.
    ///
    /// Idempotent; does not cancel in-flight processing — closing the
    /// dialog and finishing remote processing are independent.
    pub fn close_editor(&self) {
        if let Some(handle) = self.inner.dialog.lock().expect("dialog lock").take() {
            handle.close();
        }
        self.inner.view.focus();
    }

    /// Handles the dialog's save callback for an edited asset.
    ///
    /// Registers the edit in the active set (ignoring a duplicate save for
    /// an asset id already in flight), applies the processing indicator,
    /// registers a pending action, and spawns the poll task that drives
    /// the edit to its terminal outcome.
    pub fn handle_save(&self, target: NodeId, asset: AssetRecord) {
        let inner = Arc::clone(&self.inner);
        let asset_id = asset.id.clone();
        let cancel = CancellationToken::new();

        let registered = inner.active.insert_if_absent(ProcessingState {
            asset_id: asset_id.clone(),
            target_node: target,
            cancel: cancel.clone(),
        });
        if !registered {
            tracing::debug!(
                target: TRACING_TARGET_SESSION,
                asset_id = %asset_id,
                "Edit already in flight, ignoring save"
            );
            return;
        }
        inner.publish_processing();

        inner
            .view
            .mark_processing(target, asset.metadata.width, asset.metadata.height);
        let pending = inner.pending.register(&inner.config.pending_label);

        tracing::info!(
            target: TRACING_TARGET_SESSION,
            asset_id = %asset_id,
            "Waiting for edited asset processing"
        );

        tokio::spawn(async move {
            let outcome = poll_until_processed(
                inner.provider.as_ref(),
                &asset_id,
                &inner.config.retry,
                &cancel,
            )
            .await;

            match outcome {
                Ok(record) => {
                    inner.apply_replacement(&record);
                    inner.view.refresh(target);
                    tracing::info!(
                        target: TRACING_TARGET_SESSION,
                        asset_id = %asset_id,
                        "Edited asset applied"
                    );
                }
                Err(err) if err.is_cancelled() => {
                    // A cancelled-and-removed node no longer renders, so
                    // there is nothing to revert.
                    if !inner.document.in_graveyard(target) {
                        inner.view.refresh(target);
                    }
                    tracing::debug!(
                        target: TRACING_TARGET_SESSION,
                        asset_id = %asset_id,
                        "Edit cancelled"
                    );
                }
                Err(err) => {
                    inner.view.refresh(target);
                    match &err {
                        Error::RetryExhausted { attempts } => {
                            tracing::warn!(
                                target: TRACING_TARGET_SESSION,
                                asset_id = %asset_id,
                                attempts,
                                "Edited asset never became ready"
                            );
                        }
                        _ => {
                            tracing::error!(
                                target: TRACING_TARGET_SESSION,
                                asset_id = %asset_id,
                                error = %err,
                                "Unexpected asset processing failure"
                            );
                        }
                    }
                    inner.notifier.warn(PROCESSING_FAILED_WARNING);
                }
            }

            inner.active.remove(&asset_id);
            pending.retire();
            inner.publish_processing();
        });
    }

    /// Signals cancellation for every in-flight edit whose target node now
    /// resides in the removed-content holding area.
    ///
    /// The watcher task calls this on every document change; hosts without
    /// a change feed may call it directly.
    pub fn cancel_for_deleted_nodes(&self) {
        self.inner.cancel_for_deleted_nodes();
    }

    /// Returns `true` while an edit for the asset id is in flight.
    pub fn is_processing(&self, asset_id: &AssetId) -> bool {
        self.inner.active.contains(asset_id)
    }

    /// Watches the number of in-flight edits.
    ///
    /// Hosts recompute command enablement from this channel; it also lets
    /// tests await quiescence.
    pub fn watch_processing(&self) -> watch::Receiver<usize> {
        self.inner.processing_tx.subscribe()
    }

    /// Destroys the session.
    ///
    /// Closes any open dialog, signals cancellation for every in-flight
    /// edit, and releases the change-feed subscription. Safe to call with
    /// an empty active set, and more than once.
    pub fn destroy(&self) {
        let inner = &self.inner;

        if let Some(handle) = inner.dialog.lock().expect("dialog lock").take() {
            handle.close();
        }
        inner.view.focus();

        inner.active.cancel_all();
        inner.shutdown.cancel();
        if let Some(watcher) = inner.watcher.lock().expect("watcher lock").take() {
            watcher.abort();
        }

        tracing::debug!(
            target: TRACING_TARGET_SESSION,
            "Session destroyed"
        );
    }
}

impl<P, D, V, L, N, A> Inner<P, D, V, L, N, A>
where
    P: ProvideAssetStatus + 'static,
    D: DocumentModel,
    V: EditingView,
    L: DialogLauncher,
    N: Notifier,
    A: PendingActions,
{
    fn spawn_watcher(inner: &Arc<Self>) -> JoinHandle<()> {
        let mut feed = inner.document.subscribe();
        let shutdown = inner.shutdown.clone();
        let weak = Arc::downgrade(inner);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    () = shutdown.cancelled() => break,

                    event = feed.recv() => match event {
                        Err(broadcast::error::RecvError::Closed) => break,
                        // A lagged feed still means the document changed.
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            let Some(inner) = weak.upgrade() else { break };
                            inner.cancel_for_deleted_nodes();
                        }
                    },
                }
            }
        })
    }

    fn cancel_for_deleted_nodes(&self) {
        self.active
            .cancel_where(|node| self.document.in_graveyard(node));
    }

    fn publish_processing(&self) {
        self.processing_tx.send_replace(self.active.len());
    }

    /// Swaps the target node for one carrying the processed asset, in a
    /// single document transaction.
    fn apply_replacement(&self, record: &AssetRecord) {
        let attrs = ReplacementAttributes::from_record(record);

        self.document.change(&mut |writer| {
            // Re-resolve at mutation time; the node may have moved or been
            // deleted since the poll started.
            let Some(target) = writer.resolve_asset_node(&attrs.asset_id) else {
                tracing::debug!(
                    target: TRACING_TARGET_SESSION,
                    asset_id = %attrs.asset_id,
                    "Target node gone, skipping replacement"
                );
                return;
            };

            let saved = writer.selection();
            writer.select_node(target);
            let replacement = writer.insert_like(target, &attrs.to_attribute_pairs());
            writer.move_children(target, replacement);
            writer.set_attribute(
                replacement,
                ReplacementAttributes::ASSET_ID_KEY,
                json!(attrs.asset_id.as_str()),
            );
            writer.set_selection(&saved);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pictor_core::ProcessingStatus;
    use pictor_core::mock::{
        MockDocument, MockNotifier, MockPendingActions, MockView, ScriptedStatusProvider,
        asset_record,
    };

    use super::*;

    /// Dialog launcher recording mounts and tracking open handles.
    #[derive(Debug, Default)]
    struct MockDialogs {
        mounts: Mutex<Vec<DialogOptions>>,
        open: Arc<AtomicUsize>,
    }

    impl MockDialogs {
        fn mount_count(&self) -> usize {
            self.mounts.lock().expect("mounts lock").len()
        }

        fn open_count(&self) -> usize {
            self.open.load(Ordering::SeqCst)
        }

        fn last_options(&self) -> Option<DialogOptions> {
            self.mounts.lock().expect("mounts lock").last().cloned()
        }
    }

    impl DialogLauncher for MockDialogs {
        fn mount(&self, options: DialogOptions) -> DialogHandle {
            self.mounts.lock().expect("mounts lock").push(options);
            self.open.fetch_add(1, Ordering::SeqCst);

            let open = Arc::clone(&self.open);
            DialogHandle::new(move || {
                open.fetch_sub(1, Ordering::SeqCst);
            })
        }
    }

    type TestSession = AssetProcessingSession<
        ScriptedStatusProvider,
        MockDocument,
        MockView,
        MockDialogs,
        MockNotifier,
        MockPendingActions,
    >;

    struct Harness {
        provider: Arc<ScriptedStatusProvider>,
        document: Arc<MockDocument>,
        view: Arc<MockView>,
        dialogs: Arc<MockDialogs>,
        notifier: Arc<MockNotifier>,
        pending: Arc<MockPendingActions>,
        session: TestSession,
    }

    fn harness(provider: ScriptedStatusProvider) -> Harness {
        let provider = Arc::new(provider);
        let document = Arc::new(MockDocument::new());
        let view = Arc::new(MockView::default());
        let dialogs = Arc::new(MockDialogs::default());
        let notifier = Arc::new(MockNotifier::default());
        let pending = Arc::new(MockPendingActions::default());

        let session = AssetProcessingSession::new(
            Arc::clone(&provider),
            Arc::clone(&document),
            Arc::clone(&view),
            Arc::clone(&dialogs),
            Arc::clone(&notifier),
            Arc::clone(&pending),
            SessionConfig::default(),
        );

        Harness {
            provider,
            document,
            view,
            dialogs,
            notifier,
            pending,
            session,
        }
    }

    async fn wait_idle(session: &TestSession) {
        let mut watch = session.watch_processing();
        watch
            .wait_for(|count| *count == 0)
            .await
            .expect("session alive");
    }

    #[tokio::test]
    async fn test_open_editor_mounts_once() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);

        h.session.open_editor(node);
        assert!(h.session.is_open());
        assert_eq!(h.dialogs.mount_count(), 1);

        // Opening while already open is a no-op.
        h.session.open_editor(node);
        assert_eq!(h.dialogs.mount_count(), 1);

        let options = h.dialogs.last_options().expect("dialog mounted");
        assert_eq!(options.asset_id, asset_id);
        assert!(!options.allow_overwrite);

        h.session.close_editor();
        assert!(!h.session.is_open());
        assert_eq!(h.dialogs.open_count(), 0);
        assert_eq!(h.view.focus_count(), 1);

        // Closing again stays idempotent but still restores focus.
        h.session.close_editor();
        assert_eq!(h.dialogs.open_count(), 0);

        h.session.destroy();
    }

    #[tokio::test]
    async fn test_open_editor_requires_asset_id() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let root = h.document.root();
        let plain = h.document.insert_node(root, "paragraph", &[]);

        h.session.open_editor(plain);
        assert!(!h.session.is_open());
        assert_eq!(h.dialogs.mount_count(), 0);

        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_applies_replacement_after_polling() {
        let record = asset_record("img-1", 400, 200, Some(ProcessingStatus::Success));
        let h = harness(ScriptedStatusProvider::queued_then_success(2, record));

        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);
        let caption = h.document.insert_node(node, "caption", &[]);
        h.document.select_at(h.document.root());
        let selection_before = h.document.selection();

        h.session
            .handle_save(node, asset_record("img-1", 400, 200, None));
        assert!(h.session.is_processing(&asset_id));
        assert_eq!(h.view.processing_dimensions(node), Some((400, 200)));
        assert_eq!(h.pending.active_count(), 1);

        wait_idle(&h.session).await;

        assert_eq!(h.provider.calls(), 3);
        assert!(!h.session.is_processing(&asset_id));
        assert_eq!(h.pending.active_count(), 0);
        assert_eq!(h.notifier.warning_count(), 0);

        // The whole replacement was one transaction.
        assert_eq!(h.document.transaction_count(), 1);

        let replacement = h
            .document
            .resolve_asset_node(&asset_id)
            .expect("replacement resolvable by unchanged asset id");
        assert_ne!(replacement, node);
        assert!(h.document.in_graveyard(node));
        assert_eq!(h.document.attribute(replacement, "width"), Some(json!(400)));
        assert_eq!(
            h.document.attribute(replacement, "height"),
            Some(json!(200))
        );
        assert_eq!(h.document.children(replacement), vec![caption]);
        assert_eq!(h.document.selection(), selection_before);

        // Processing indicator reverted.
        assert!(!h.view.is_processing(node));

        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_save_ignored() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);

        h.session
            .handle_save(node, asset_record("img-1", 200, 100, None));
        h.session
            .handle_save(node, asset_record("img-1", 200, 100, None));

        assert_eq!(h.pending.active_count(), 1);

        // An in-flight node cannot be opened for editing again.
        h.session.open_editor(node);
        assert_eq!(h.dialogs.mount_count(), 0);

        h.session.destroy();
        wait_idle(&h.session).await;
        assert_eq!(h.notifier.warning_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_warns_and_reverts() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);

        h.session
            .handle_save(node, asset_record("img-1", 200, 100, None));
        wait_idle(&h.session).await;

        assert_eq!(h.provider.calls(), 5);
        assert_eq!(h.notifier.warning_count(), 1);
        assert!(!h.view.is_processing(node));
        assert_eq!(h.view.refresh_count(node), 1);

        // The document was never mutated.
        assert_eq!(h.document.transaction_count(), 0);
        assert_eq!(h.document.resolve_asset_node(&asset_id), Some(node));

        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_node_cancels_in_flight_edit() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);

        h.session
            .handle_save(node, asset_record("img-1", 200, 100, None));
        tokio::task::yield_now().await;

        h.document.remove_node(node);
        wait_idle(&h.session).await;

        assert!(!h.session.is_processing(&asset_id));
        assert_eq!(h.notifier.warning_count(), 0);
        assert_eq!(h.document.transaction_count(), 0);
        assert!(h.provider.calls() < 5);

        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_cancels_all_in_flight_edits() {
        let h = harness(ScriptedStatusProvider::always_queued());
        let first = AssetId::new("img-1");
        let second = AssetId::new("img-2");
        let first_node = h.document.insert_image(&first, 200, 100);
        let second_node = h.document.insert_image(&second, 300, 150);

        h.session.open_editor(first_node);
        h.session
            .handle_save(first_node, asset_record("img-1", 200, 100, None));
        h.session
            .handle_save(second_node, asset_record("img-2", 300, 150, None));
        assert_eq!(h.pending.active_count(), 2);

        h.session.destroy();
        wait_idle(&h.session).await;

        assert!(!h.session.is_processing(&first));
        assert!(!h.session.is_processing(&second));
        assert_eq!(h.pending.active_count(), 0);
        assert_eq!(h.notifier.warning_count(), 0);
        assert!(!h.session.is_open());
        assert_eq!(h.dialogs.open_count(), 0);

        // Destroying again is safe.
        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_skipped_when_node_gone_at_mutation_time() {
        // Polling succeeds, but by mutation time no live node carries the
        // asset id; the transaction commits as a silent no-op.
        let record = asset_record("img-1", 400, 200, Some(ProcessingStatus::Success));
        let h = harness(ScriptedStatusProvider::queued_then_success(0, record));

        let asset_id = AssetId::new("img-1");
        let ghost = NodeId::generate();
        let selection_before = h.document.selection();

        h.session
            .handle_save(ghost, asset_record("img-1", 400, 200, None));
        wait_idle(&h.session).await;

        assert_eq!(h.notifier.warning_count(), 0);
        assert_eq!(h.document.transaction_count(), 1);
        assert_eq!(h.document.resolve_asset_node(&asset_id), None);
        assert_eq!(h.document.selection(), selection_before);

        h.session.destroy();
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_img1_edit() {
        // Submit an edit for a 200x100 image; the service reports queued,
        // queued, then success with 400x200. The final node keeps its id,
        // carries the new dimensions, and the indicator is gone.
        let record = asset_record("img-1", 400, 200, Some(ProcessingStatus::Success));
        let h = harness(ScriptedStatusProvider::queued_then_success(2, record));

        let asset_id = AssetId::new("img-1");
        let node = h.document.insert_image(&asset_id, 200, 100);

        h.session.open_editor(node);
        h.session
            .handle_save(node, asset_record("img-1", 400, 200, None));
        h.session.close_editor();

        wait_idle(&h.session).await;

        let replacement = h
            .document
            .resolve_asset_node(&asset_id)
            .expect("node still resolvable by asset id");
        assert_eq!(h.document.attribute(replacement, "width"), Some(json!(400)));
        assert_eq!(
            h.document.attribute(replacement, "height"),
            Some(json!(200))
        );
        assert_eq!(
            h.document
                .attribute(replacement, ReplacementAttributes::ASSET_ID_KEY),
            Some(json!("img-1"))
        );
        assert!(!h.view.is_processing(replacement));
        assert!(!h.view.is_processing(node));

        h.session.destroy();
    }
}
