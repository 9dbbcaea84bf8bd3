//! Livecraft - Core Library
//!
//! Turns a streamed model response into a versioned in-memory project and
//! synthesizes a sandboxed, self-contained preview document from it.

pub mod config;
pub mod error;
pub mod history;
pub mod parser;
pub mod persistence;
pub mod pipeline;
pub mod preview;
pub mod sandbox;
pub mod starter;
pub mod store;
pub mod stream;
pub mod tree;
pub mod types;
pub mod watcher;

pub use config::*;
pub use error::*;
pub use history::{ChangeKind, HistoryEntry, HistoryManager, DEFAULT_HISTORY_LIMIT};
pub use parser::{parse_file_blocks, strip_file_blocks};
pub use persistence::{JsonProjectStore, ProjectRepository};
pub use pipeline::{Pipeline, TurnOutcome};
pub use preview::{PreviewCompiler, PreviewDocument, SynthesisError, TransformError};
pub use sandbox::{PreviewState, SandboxCapability, SandboxHost, SandboxPolicy};
pub use store::ArtifactStore;
pub use stream::{RecordFormat, StreamIngestor, StreamOutcome};
pub use tree::build_file_tree;
pub use types::*;

pub use livecraft_types;
