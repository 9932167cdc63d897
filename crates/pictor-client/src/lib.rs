#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for asset client operations.
///
/// Use this target for logging client initialization, configuration, and
/// request-level errors.
pub const TRACING_TARGET_CLIENT: &str = "pictor_client::client";

mod client;
pub mod error;
#[doc(hidden)]
pub mod prelude;

pub use crate::client::{AssetClient, ClientBuilder, ClientConfig, Credentials};
pub use crate::error::{Error, Result};
