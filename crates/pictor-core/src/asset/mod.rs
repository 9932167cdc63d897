//! Remote asset types and the status provider seam.
//!
//! The remote service identifies every editable asset by an opaque id and
//! exposes a status endpoint describing whether post-edit processing has
//! finished. This module defines the wire models for that endpoint and the
//! [`ProvideAssetStatus`] trait implemented by concrete transports.

mod provider;
mod record;
mod replacement;

pub use provider::ProvideAssetStatus;
pub use record::{AssetId, AssetMetadata, AssetRecord, AssetSource, ProcessingStatus};
pub use replacement::ReplacementAttributes;
