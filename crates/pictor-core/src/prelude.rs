//! Prelude for the pictor-core crate
//!
//! This module re-exports the most commonly used types and traits from the
//! crate to provide a convenient single import for users.

pub use crate::asset::{
    AssetId, AssetMetadata, AssetRecord, AssetSource, ProcessingStatus, ProvideAssetStatus,
    ReplacementAttributes,
};
pub use crate::document::{DocumentChange, DocumentModel, DocumentWriter, NodeId, Selection};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::notify::{Notifier, PendingAction, PendingActions};
pub use crate::view::EditingView;
