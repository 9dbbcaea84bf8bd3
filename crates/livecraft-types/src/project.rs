//! Project types

use super::{Message, ParsedFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named project: its files and the conversation that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub files: Vec<ParsedFile>,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, files: Vec<ParsedFile>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            files,
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Download artifact for this project
    pub fn export(&self) -> ProjectExport {
        ProjectExport {
            name: self.name.clone(),
            files: self.files.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Exported project: `{name, files, timestamp}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
    pub name: String,
    pub files: Vec<ParsedFile>,
    pub timestamp: DateTime<Utc>,
}
