//! Prelude for the pictor-session crate
//!
//! This module re-exports the most commonly used types and traits from the
//! crate to provide a convenient single import for users.

pub use crate::dialog::{DialogHandle, DialogLauncher, DialogOptions};
pub use crate::error::{Error, Result};
pub use crate::retry::RetryPolicy;
pub use crate::session::{AssetProcessingSession, SessionConfig};
