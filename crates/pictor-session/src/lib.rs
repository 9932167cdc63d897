#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for session lifecycle operations.
pub const TRACING_TARGET_SESSION: &str = "pictor_session::session";

/// Tracing target for the status poll loop.
pub const TRACING_TARGET_POLL: &str = "pictor_session::poll";

pub mod dialog;
pub mod error;
mod poll;
#[doc(hidden)]
pub mod prelude;
mod retry;
mod session;
mod state;

pub use crate::dialog::{DialogHandle, DialogLauncher, DialogOptions};
pub use crate::error::{Error, Result};
pub use crate::poll::poll_until_processed;
pub use crate::retry::RetryPolicy;
pub use crate::session::{AssetProcessingSession, SessionConfig};
