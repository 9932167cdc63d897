//! Error types for pictor-session
//!
//! The session distinguishes three terminal outcomes of a poll loop:
//! exhausted retries, cancellation, and an unexpected transport failure.
//! Cancellation is not an error from the user's point of view and is never
//! surfaced; the other two produce the same generic user-facing warning.

use pictor_core::Error as CoreError;

/// Result type for all session operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Terminal outcome of a failed or aborted poll loop
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service did not finish processing within the attempt cap
    #[error("Asset processing did not finish after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    /// The work was cancelled: the target node was deleted or the session
    /// was destroyed mid-flight
    #[error("Asset processing cancelled")]
    Cancelled,

    /// Any other failure of the status transport
    #[error("Asset status request failed: {0}")]
    Transport(#[source] CoreError),
}

impl Error {
    /// Create a retry-exhausted error
    pub fn retry_exhausted(attempts: u32) -> Self {
        Self::RetryExhausted { attempts }
    }

    /// Returns `true` if this outcome is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classify a core error from the status provider.
    ///
    /// Cancellation keeps its identity so it can be silently discarded;
    /// everything else becomes a transport failure.
    pub fn from_core(err: CoreError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_distinct() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::retry_exhausted(5).is_cancelled());
        assert!(Error::from_core(CoreError::cancelled()).is_cancelled());
        assert!(!Error::from_core(CoreError::network_error()).is_cancelled());
    }
}
