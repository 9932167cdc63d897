//! Asset status client implementation.

mod asset_client;
mod config;
mod credentials;
mod provider;

pub use asset_client::AssetClient;
pub use config::{ClientBuilder, ClientBuilderError, ClientConfig};
pub use credentials::Credentials;
