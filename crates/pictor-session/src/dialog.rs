//! Seam for the third-party editing dialog.
//!
//! The dialog is a black box: the session mounts it with a fixed set of
//! options and the host wires the dialog's close/save callbacks back to
//! [`close_editor`](crate::AssetProcessingSession::close_editor) and
//! [`handle_save`](crate::AssetProcessingSession::handle_save).

use pictor_core::AssetId;
use url::Url;

/// Options the dialog is mounted with.
#[derive(Debug, Clone)]
pub struct DialogOptions {
    /// Asset to edit.
    pub asset_id: AssetId,
    /// Whether the edit may overwrite the original asset. The session
    /// always mounts with `false`: an edit produces a new rendition.
    pub allow_overwrite: bool,
    /// Endpoint the dialog obtains its authorization token from.
    pub token_url: Option<Url>,
}

/// Launches the external editing dialog.
pub trait DialogLauncher: Send + Sync + 'static {
    /// Mounts the dialog and returns a handle that tears it down.
    fn mount(&self, options: DialogOptions) -> DialogHandle;
}

/// Handle of one mounted dialog.
///
/// Dropping the handle tears the mount point down exactly once.
pub struct DialogHandle {
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl DialogHandle {
    /// Creates a handle that invokes `on_close` when closed or dropped.
    pub fn new(on_close: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_close: Some(Box::new(on_close)),
        }
    }

    /// A handle with no teardown effect.
    pub fn noop() -> Self {
        Self { on_close: None }
    }

    /// Tears the mount point down explicitly.
    pub fn close(mut self) {
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
    }
}

impl Drop for DialogHandle {
    fn drop(&mut self) {
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
    }
}

impl std::fmt::Debug for DialogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogHandle")
            .field("closed", &self.on_close.is_none())
            .finish()
    }
}
