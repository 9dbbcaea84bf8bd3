//! HTTP handlers

pub mod chat;
pub mod health;

pub use health::health;
