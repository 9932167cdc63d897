#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Pictor Core
//!
//! This crate provides the foundational abstractions for the pictor asset
//! processing workflow. It defines the remote asset wire models, the status
//! provider seam, and the narrow document/view/notification interfaces the
//! session operates against, without depending on any concrete document
//! engine or transport.

mod error;

pub mod asset;
pub mod document;
pub mod notify;
#[doc(hidden)]
pub mod prelude;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

// Re-export key types for convenience
pub use crate::asset::{
    AssetId, AssetMetadata, AssetRecord, AssetSource, ProcessingStatus, ProvideAssetStatus,
    ReplacementAttributes,
};
pub use crate::document::{
    DocumentChange, DocumentModel, DocumentWriter, NodeId, Position, Selection, SelectionRange,
};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::notify::{Notifier, PendingAction, PendingActions};
pub use crate::view::EditingView;
