//! Configuration management for Livecraft

use crate::error::{CoreError, Result};
use crate::sandbox::{is_denied_token, SandboxCapability};
use crate::types::{AppConfig, ValidationError, ValidationResult, ValidationWarning};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "livecraft.config.yaml",
    "livecraft.config.yml",
    "livecraft.config.json",
];

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// Configuration manager for loading and saving configurations
pub struct ConfigManager {
    cache: std::collections::HashMap<PathBuf, CachedConfig>,
}

struct CachedConfig {
    config: AppConfig,
    modified_time: std::time::SystemTime,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            cache: std::collections::HashMap::new(),
        }
    }

    /// Find configuration file in a directory
    pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from a file
    pub fn load(&mut self, config_path: &Path) -> Result<AppConfig> {
        let metadata = std::fs::metadata(config_path)?;
        let modified_time = metadata
            .modified()
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH);

        if let Some(cached) = self.cache.get(config_path) {
            if cached.modified_time == modified_time {
                return Ok(cached.config.clone());
            }
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = if is_json(config_path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(path = %config_path.display(), "Loaded configuration");

        self.cache.insert(
            config_path.to_path_buf(),
            CachedConfig {
                config: config.clone(),
                modified_time,
            },
        );

        Ok(config)
    }

    /// Load configuration from a directory (searches for config files)
    pub fn load_from_directory(&mut self, dir: &Path) -> Result<(AppConfig, PathBuf)> {
        let config_path = Self::find_config_file(dir)
            .ok_or_else(|| CoreError::ConfigNotFound(dir.display().to_string()))?;

        let config = self.load(&config_path)?;
        Ok((config, config_path))
    }

    /// Load from a directory, falling back to defaults when no file exists
    pub fn load_or_default(&mut self, dir: &Path) -> Result<AppConfig> {
        match self.load_from_directory(dir) {
            Ok((config, _)) => Ok(config),
            Err(CoreError::ConfigNotFound(_)) => Ok(AppConfig::default()),
            Err(e) => Err(e),
        }
    }

    /// Validate a configuration
    pub fn validate(&self, config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://")) {
            result = result.with_error(ValidationError {
                field: "endpoint".to_string(),
                message: "Endpoint must be an http(s) URL".to_string(),
                code: "INVALID_ENDPOINT".to_string(),
            });
        }

        if config.model.trim().is_empty() {
            result = result.with_warning(ValidationWarning {
                field: "model".to_string(),
                message: "No model configured, the relay default will be used".to_string(),
                suggestion: None,
            });
        }

        if config.history_limit == 0 {
            result = result.with_error(ValidationError {
                field: "history_limit".to_string(),
                message: "History limit must be at least 1".to_string(),
                code: "INVALID_HISTORY_LIMIT".to_string(),
            });
        }

        for name in &config.preview.entry_candidates {
            if !IDENTIFIER.is_match(name) {
                result = result.with_error(ValidationError {
                    field: "preview.entry_candidates".to_string(),
                    message: format!("Entry candidate is not an identifier: {}", name),
                    code: "INVALID_ENTRY".to_string(),
                });
            }
        }

        if config.preview.mount_id.trim().is_empty() {
            result = result.with_error(ValidationError {
                field: "preview.mount_id".to_string(),
                message: "Mount element id must not be empty".to_string(),
                code: "INVALID_MOUNT_ID".to_string(),
            });
        }

        if config.preview.max_document_bytes == 0 {
            result = result.with_error(ValidationError {
                field: "preview.max_document_bytes".to_string(),
                message: "Document size limit must be positive".to_string(),
                code: "INVALID_LIMIT".to_string(),
            });
        }

        for token in &config.sandbox.capabilities {
            if is_denied_token(token) {
                result = result.with_error(ValidationError {
                    field: "sandbox.capabilities".to_string(),
                    message: format!("Capability is never granted: {}", token),
                    code: "FORBIDDEN_CAPABILITY".to_string(),
                });
            } else if SandboxCapability::from_token(token).is_none() {
                result = result.with_warning(ValidationWarning {
                    field: "sandbox.capabilities".to_string(),
                    message: format!("Unknown capability will be ignored: {}", token),
                    suggestion: Some(
                        "Use one of allow-scripts, allow-modals, allow-popups, allow-forms, allow-same-origin"
                            .to_string(),
                    ),
                });
            }
        }

        result
    }

    /// Save configuration to a file
    pub fn save(&self, config: &AppConfig, config_path: &Path) -> Result<()> {
        let content = if is_json(config_path) {
            serde_json::to_string_pretty(config)?
        } else {
            serde_yaml::to_string(config)?
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, content)?;

        Ok(())
    }

    pub fn create_default() -> AppConfig {
        AppConfig::default()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}
