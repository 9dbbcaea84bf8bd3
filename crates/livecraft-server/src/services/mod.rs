//! Relay services

pub mod relay;
pub mod upstream;

pub use relay::spawn_relay;
pub use upstream::{UpstreamClient, UpstreamConfig, UpstreamError};
