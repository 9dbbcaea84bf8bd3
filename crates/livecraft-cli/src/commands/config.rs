//! Config command - show or initialize configuration

use crate::config::LivecraftHome;
use anyhow::{Context, Result};
use colored::Colorize;
use livecraft_core::{ConfigManager, SandboxPolicy};

/// Show the effective configuration
pub async fn show() -> Result<()> {
    let config = LivecraftHome::load_config()?;
    let source = LivecraftHome::config_source()?;

    println!("{}", "⚙️  Livecraft configuration".blue().bold());
    println!();
    match source {
        Some(path) => println!("  Source: {}", path.display().to_string().dimmed()),
        None => println!("  Source: {}", "(defaults)".dimmed()),
    }
    println!(
        "  Home: {}",
        LivecraftHome::root()?.display().to_string().dimmed()
    );
    println!();
    println!("  Endpoint: {}", config.endpoint.cyan());
    println!("  Model: {}", config.model.cyan());
    println!("  History limit: {}", config.history_limit);
    println!();
    println!("  {}", "Preview".bold());
    println!("    Entry candidates: {}", config.preview.entry_candidates.join(", "));
    println!("    Mount id: {}", config.preview.mount_id);
    println!("    Max document size: {} bytes", config.preview.max_document_bytes);
    println!("    React: {}", config.preview.runtime.react.dimmed());
    println!("    ReactDOM: {}", config.preview.runtime.react_dom.dimmed());
    println!("    Icons: {}", config.preview.runtime.icons.dimmed());
    println!("    Motion: {}", config.preview.runtime.motion.dimmed());
    println!();
    println!("  {}", "Sandbox".bold());
    println!(
        "    Capabilities: {}",
        SandboxPolicy::from_config(&config.sandbox).attribute()
    );

    Ok(())
}

/// Write a default config file in the current directory
pub async fn init(force: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;

    if let Some(existing) = ConfigManager::find_config_file(&cwd) {
        if !force {
            let confirm = dialoguer::Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite?", existing.display()))
                .default(false)
                .interact()?;
            if !confirm {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
        }
    }

    let path = cwd.join("livecraft.config.yaml");
    let manager = ConfigManager::new();
    manager
        .save(&ConfigManager::create_default(), &path)
        .context("Failed to write default config")?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
