//! Status poll loop with bounded retry and cooperative cancellation.

use pictor_core::{AssetId, AssetRecord, ProvideAssetStatus};
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_POLL;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Polls the status provider until the asset is processed.
///
/// Issues up to `policy.max_attempts()` status requests, backing off
/// between attempts. Recoverable failures (asset still queued, transient
/// transport errors) trigger a retry; anything else is terminal. The
/// cancellation token is checked before every attempt, during backoff, and
/// is passed through to the provider so an in-flight request aborts
/// promptly.
///
/// # Errors
///
/// [`Error::Cancelled`] when the token fires at any point,
/// [`Error::RetryExhausted`] when every attempt reported a recoverable
/// failure, and [`Error::Transport`] on the first non-recoverable one.
#[tracing::instrument(
    skip(provider, policy, cancel),
    fields(asset_id = %asset_id),
    target = "pictor_session::poll",
    name = "poll_asset_status"
)]
pub async fn poll_until_processed<P>(
    provider: &P,
    asset_id: &AssetId,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<AssetRecord>
where
    P: ProvideAssetStatus + ?Sized,
{
    for attempt in 1..=policy.max_attempts() {
        if cancel.is_cancelled() {
            tracing::debug!(
                target: TRACING_TARGET_POLL,
                attempt,
                "Poll loop cancelled before attempt"
            );
            return Err(Error::Cancelled);
        }

        match provider.asset_status(asset_id, cancel).await {
            Ok(record) => {
                tracing::debug!(
                    target: TRACING_TARGET_POLL,
                    attempt,
                    width = record.metadata.width,
                    height = record.metadata.height,
                    "Asset processed"
                );
                return Ok(record);
            }
            Err(err) if err.is_cancelled() => {
                return Err(Error::Cancelled);
            }
            Err(err) if err.is_recoverable() => {
                if attempt == policy.max_attempts() {
                    tracing::warn!(
                        target: TRACING_TARGET_POLL,
                        attempts = policy.max_attempts(),
                        "Retries exhausted waiting for asset processing"
                    );
                    return Err(Error::retry_exhausted(policy.max_attempts()));
                }

                tracing::debug!(
                    target: TRACING_TARGET_POLL,
                    attempt,
                    error = %err,
                    "Asset not ready, backing off"
                );

                tokio::select! {
                    biased;

                    () = cancel.cancelled() => {
                        return Err(Error::Cancelled);
                    }

                    () = tokio::time::sleep(policy.delay_for(attempt)) => {}
                }
            }
            Err(err) => {
                return Err(Error::from_core(err));
            }
        }
    }

    // Unreachable with a clamped attempt cap, kept for completeness.
    Err(Error::retry_exhausted(policy.max_attempts()))
}

#[cfg(test)]
mod tests {
    use pictor_core::mock::{ScriptedStatusProvider, asset_record};
    use pictor_core::{Error as CoreError, ProcessingStatus};

    use super::*;

    fn success_record() -> pictor_core::AssetRecord {
        asset_record("img-1", 400, 200, Some(ProcessingStatus::Success))
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_four_times_then_success() {
        let provider = ScriptedStatusProvider::queued_then_success(4, success_record());
        let cancel = CancellationToken::new();

        let record = poll_until_processed(
            &provider,
            &AssetId::new("img-1"),
            &RetryPolicy::default(),
            &cancel,
        )
        .await
        .expect("processed within the attempt cap");

        assert_eq!(record.metadata.width, 400);
        assert_eq!(record.metadata.height, 200);
        assert_eq!(provider.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_queued_exhausts_retries() {
        let provider = ScriptedStatusProvider::always_queued();
        let cancel = CancellationToken::new();

        let err = poll_until_processed(
            &provider,
            &AssetId::new("img-1"),
            &RetryPolicy::default(),
            &cancel,
        )
        .await
        .expect_err("retries exhausted");

        assert!(matches!(err, Error::RetryExhausted { attempts: 5 }));
        assert_eq!(provider.calls(), 5);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let provider = ScriptedStatusProvider::queued_then_success(0, success_record());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poll_until_processed(
            &provider,
            &AssetId::new("img-1"),
            &RetryPolicy::default(),
            &cancel,
        )
        .await
        .expect_err("cancelled");

        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_backoff() {
        let provider = ScriptedStatusProvider::always_queued();
        let cancel = CancellationToken::new();

        let asset_id = AssetId::new("img-1");
        let policy = RetryPolicy::default();
        let poll = poll_until_processed(&provider, &asset_id, &policy, &cancel);
        tokio::pin!(poll);

        // Let the first attempt run and the loop park in its backoff.
        assert!(
            futures_poll_pending(poll.as_mut()).await,
            "loop should be waiting in backoff"
        );
        cancel.cancel();

        let err = poll.await.expect_err("cancelled");
        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_recoverable_error_is_terminal() {
        let provider = ScriptedStatusProvider::new(vec![Err(
            CoreError::authentication().with_message("bad token")
        )]);
        let cancel = CancellationToken::new();

        let err = poll_until_processed(
            &provider,
            &AssetId::new("img-1"),
            &RetryPolicy::default(),
            &cancel,
        )
        .await
        .expect_err("terminal transport error");

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(provider.calls(), 1);
    }

    /// Polls the future once on the current runtime; returns `true` if it
    /// is still pending.
    async fn futures_poll_pending(
        fut: std::pin::Pin<&mut (impl Future<Output = Result<AssetRecord>> + Send)>,
    ) -> bool {
        tokio::select! {
            biased;
            _ = fut => false,
            () = tokio::task::yield_now() => true,
        }
    }
}
