//! Wire models for the remote asset status endpoint.

use derive_more::{AsRef, Display, From, Into};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// Opaque identifier of a remote asset.
///
/// Asset ids are assigned by the remote service and carried on document
/// nodes as an attribute; the id is the key of the session's active set.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, AsRef, Display, From, Into, Serialize, Deserialize,
)]
#[as_ref(str)]
pub struct AssetId(String);

impl AssetId {
    /// Creates a new asset id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Post-edit processing status reported by the remote service.
///
/// Anything other than [`ProcessingStatus::Success`] means the edited asset
/// is not ready to be applied to the document yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// The service has accepted the edit and queued processing.
    Queued,
    /// Processing finished and the asset metadata is final.
    Success,
    /// Any status value this client does not recognize.
    #[serde(other)]
    Unrecognized,
}

/// Dimensional and processing metadata of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Pixel width of the asset.
    pub width: u64,
    /// Pixel height of the asset.
    pub height: u64,
    /// Low-resolution placeholder for progressive rendering, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurhash: Option<String>,
    /// Post-edit processing status; absent while the service has not
    /// started processing the edit.
    #[serde(
        rename = "metadataProcessingStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_processing_status: Option<ProcessingStatus>,
}

impl AssetMetadata {
    /// Returns `true` once the service reports processing finished.
    pub fn is_processed(&self) -> bool {
        self.metadata_processing_status == Some(ProcessingStatus::Success)
    }
}

/// One entry of an asset's responsive source set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSource {
    /// URL of this rendition.
    pub url: Url,
    /// Pixel width of this rendition.
    pub width: u64,
}

/// Full asset record as returned by the remote status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Opaque asset identifier.
    pub id: AssetId,
    /// Fallback URL of the asset.
    pub url: Url,
    /// Responsive source renditions, widest last.
    #[serde(default)]
    pub sources: Vec<AssetSource>,
    /// Dimensional and processing metadata.
    pub metadata: AssetMetadata,
    /// When the record was last updated, if the service reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl AssetRecord {
    /// Returns `true` once the service reports processing finished.
    pub fn is_processed(&self) -> bool {
        self.metadata.is_processed()
    }
}
