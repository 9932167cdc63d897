//! Status provider seam implemented by concrete transports.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{AssetId, AssetRecord};
use crate::error::Result;

/// Retrieves the current record of a remote asset.
///
/// Implementations issue one status request per call; retry and backoff are
/// the caller's concern. The cancellation token must be honored so an
/// in-flight request can be aborted promptly when the target node is
/// deleted or the session is torn down.
#[async_trait]
pub trait ProvideAssetStatus: Send + Sync {
    /// Fetches the current record for `asset_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotReady`](crate::ErrorKind::NotReady) while the
    /// service still reports the edit as queued,
    /// [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled) when `cancel`
    /// fires mid-request, and a transport-specific kind otherwise.
    async fn asset_status(
        &self,
        asset_id: &AssetId,
        cancel: &CancellationToken,
    ) -> Result<AssetRecord>;
}
