//! Editing-surface seam for visual processing indicators.

use crate::document::NodeId;

/// Rendered-view operations the session needs while an edit is in flight.
///
/// The view layer owns rendering; the session only toggles a processing
/// indicator on the rendered counterpart of a document node and restores
/// focus after the external dialog closes.
pub trait EditingView: Send + Sync + 'static {
    /// Marks the rendered node as processing.
    ///
    /// Clears any cached aspect-ratio style, applies the explicit
    /// dimensions of the incoming edit, and adds the processing marker
    /// class.
    fn mark_processing(&self, node: NodeId, width: u64, height: u64);

    /// Forces a full re-render of the node, dropping the processing
    /// indicator and any inline style overrides.
    fn refresh(&self, node: NodeId);

    /// Restores input focus to the editing surface.
    fn focus(&self);
}
