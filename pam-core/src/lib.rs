//! PubNub Access Manager core
//!
//! Builds signed grant requests and normalizes the service's grant responses,
//! plus the configuration, transport and logging needed to run them.

pub mod access;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod logging;
pub mod retry;
pub mod time;

pub use access::{GrantRequest, GrantResult, KeyData};
pub use client::{Grant, PubNub};
pub use config::PamConfig;
pub use error::{PamError, PamResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
