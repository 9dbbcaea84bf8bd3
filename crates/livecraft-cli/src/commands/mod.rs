//! Subcommand implementations

pub mod chat;
pub mod config;
pub mod export;
pub mod preview;
pub mod project;
pub mod tree;
