//! [`ProvideAssetStatus`] implementation for the HTTP client.

use async_trait::async_trait;
use pictor_core::{AssetId, AssetRecord, ProvideAssetStatus};
use tokio_util::sync::CancellationToken;

use super::AssetClient;
use crate::error::Error;

#[async_trait]
impl ProvideAssetStatus for AssetClient {
    async fn asset_status(
        &self,
        asset_id: &AssetId,
        cancel: &CancellationToken,
    ) -> pictor_core::Result<AssetRecord> {
        self.status(asset_id, cancel).await.map_err(Error::into_core)
    }
}
