//! Livecraft home directory and effective configuration

use anyhow::{Context, Result};
use livecraft_core::{AppConfig, ConfigManager, JsonProjectStore};
use std::path::{Path, PathBuf};

pub struct LivecraftHome;

impl LivecraftHome {
    /// Get the livecraft home directory (~/.livecraft)
    pub fn root() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("LIVECRAFT_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".livecraft"))
    }

    /// Directory for rendered preview pages
    pub fn preview_dir() -> Result<PathBuf> {
        Ok(Self::root()?.join("preview"))
    }

    /// Project store under the home directory
    pub fn project_store() -> Result<JsonProjectStore> {
        Ok(JsonProjectStore::in_dir(&Self::root()?))
    }

    /// Effective configuration.
    ///
    /// A config file in the working directory wins over one in the home
    /// directory; with neither, defaults apply.
    pub fn load_config() -> Result<AppConfig> {
        let cwd = std::env::current_dir()?;
        let root = Self::root()?;
        load_config_from(&[cwd.as_path(), root.as_path()])
    }

    /// Config file that `load_config` would read, if any
    pub fn config_source() -> Result<Option<PathBuf>> {
        let cwd = std::env::current_dir()?;
        Ok(ConfigManager::find_config_file(&cwd)
            .or_else(|| Self::root().ok().and_then(|r| ConfigManager::find_config_file(&r))))
    }
}

fn load_config_from(search: &[&Path]) -> Result<AppConfig> {
    let mut manager = ConfigManager::new();
    for dir in search {
        if let Some(path) = ConfigManager::find_config_file(dir) {
            let config = manager
                .load(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?;

            let validation = manager.validate(&config);
            for warning in &validation.warnings {
                tracing::warn!(field = %warning.field, "{}", warning.message);
            }
            if !validation.valid {
                let messages: Vec<_> = validation
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.code, e.message))
                    .collect();
                anyhow::bail!("Invalid config {:?}: {}", path, messages.join("; "));
            }
            return Ok(config);
        }
    }
    Ok(AppConfig::default())
}
