//! User-visible notification and pending-action seams.

/// Displays user-visible messages.
pub trait Notifier: Send + Sync + 'static {
    /// Shows a warning to the user.
    fn warn(&self, message: &str);
}

/// Registry of user-visible long-running actions.
///
/// A registered action signals the host (and the user) that work is in
/// flight, typically blocking editor teardown prompts. The returned handle
/// retires the action when dropped, so every terminal path of an async
/// workflow releases it without explicit bookkeeping.
pub trait PendingActions: Send + Sync + 'static {
    /// Registers a pending action with a user-visible label.
    fn register(&self, label: &str) -> PendingAction;
}

/// Handle of one registered pending action.
///
/// Dropping the handle retires the action exactly once.
pub struct PendingAction {
    on_retire: Option<Box<dyn FnOnce() + Send>>,
}

impl PendingAction {
    /// Creates a handle that invokes `on_retire` when dropped.
    pub fn new(on_retire: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_retire: Some(Box::new(on_retire)),
        }
    }

    /// A handle with no retirement effect, for hosts without a registry.
    pub fn noop() -> Self {
        Self { on_retire: None }
    }

    /// Retires the action explicitly.
    pub fn retire(mut self) {
        if let Some(on_retire) = self.on_retire.take() {
            on_retire();
        }
    }
}

impl Drop for PendingAction {
    fn drop(&mut self) {
        if let Some(on_retire) = self.on_retire.take() {
            on_retire();
        }
    }
}

impl std::fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAction")
            .field("retired", &self.on_retire.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_retires_on_drop() {
        let retired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&retired);

        let action = PendingAction::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(retired.load(Ordering::SeqCst), 0);

        drop(action);
        assert_eq!(retired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_retire_is_once() {
        let retired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&retired);

        let action = PendingAction::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        action.retire();

        assert_eq!(retired.load(Ordering::SeqCst), 1);
    }
}
