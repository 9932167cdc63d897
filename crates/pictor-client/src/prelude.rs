//! Prelude for the pictor-client crate
//!
//! This module re-exports the most commonly used types and traits from the
//! crate to provide a convenient single import for users.

pub use crate::client::{AssetClient, ClientConfig, Credentials};
pub use crate::error::{Error, Result};
