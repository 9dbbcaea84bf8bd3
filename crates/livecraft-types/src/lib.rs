//! Livecraft Types - Pure type definitions
//!
//! Data shared by the artifact pipeline, the CLI and the relay server.
//! No async runtime and no I/O in here.

pub mod artifact;
pub mod message;
pub mod project;

pub use artifact::*;
pub use message::*;
pub use project::*;
