//! Error types for Livecraft

use crate::preview::SynthesisError;
use thiserror::Error;

/// Main error type for the core library
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration file not found in {0}")]
    ConfigNotFound(String),

    #[error("A response is already streaming")]
    TurnInProgress,

    #[error("No response is streaming")]
    NoActiveTurn,

    #[error("Path already exists: {0}")]
    PathConflict(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Preview synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
