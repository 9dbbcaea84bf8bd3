//! Configuration types for Livecraft

use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/chat";
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_MOUNT_ID: &str = "root";
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

/// Top-level configuration (`livecraft.config.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relay endpoint the CLI streams chat turns from
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            history_limit: default_history_limit(),
            preview: PreviewConfig::default(),
            sandbox: SandboxConfig::default(),
        }
    }
}

/// Preview synthesis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Component names tried, in order, when choosing what to mount
    #[serde(default = "default_entry_candidates")]
    pub entry_candidates: Vec<String>,
    #[serde(default = "default_mount_id")]
    pub mount_id: String,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_entry_candidates() -> Vec<String> {
    vec!["App".to_string(), "Home".to_string()]
}

fn default_mount_id() -> String {
    DEFAULT_MOUNT_ID.to_string()
}

fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            entry_candidates: default_entry_candidates(),
            mount_id: default_mount_id(),
            max_document_bytes: default_max_document_bytes(),
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Module URLs loaded by the preview bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_react")]
    pub react: String,
    #[serde(default = "default_react_dom")]
    pub react_dom: String,
    #[serde(default = "default_icons")]
    pub icons: String,
    #[serde(default = "default_motion")]
    pub motion: String,
}

fn default_react() -> String {
    "https://esm.sh/react@18".to_string()
}

fn default_react_dom() -> String {
    "https://esm.sh/react-dom@18/client".to_string()
}

fn default_icons() -> String {
    "https://esm.sh/lucide-react@0.454.0".to_string()
}

fn default_motion() -> String {
    "https://esm.sh/framer-motion@11".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            react: default_react(),
            react_dom: default_react_dom(),
            icons: default_icons(),
            motion: default_motion(),
        }
    }
}

/// Sandbox settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Sandbox tokens to grant, e.g. `allow-scripts`
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
}

fn default_capabilities() -> Vec<String> {
    [
        "allow-scripts",
        "allow-modals",
        "allow-popups",
        "allow-forms",
        "allow-same-origin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            capabilities: default_capabilities(),
        }
    }
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: ValidationError) -> Self {
        self.valid = false;
        self.errors.push(error);
        self
    }

    pub fn with_warning(mut self, warning: ValidationWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: AppConfig = serde_yaml::from_str("model: local/model\n").unwrap();
        assert_eq!(config.model, "local/model");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.preview.entry_candidates, vec!["App", "Home"]);
        assert_eq!(config.sandbox.capabilities.len(), 5);
    }
}
