//! Export command - write a project as `{name, files, timestamp}` JSON

use super::project::resolve;
use crate::config::LivecraftHome;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub async fn run(project: Option<&str>, out: Option<PathBuf>) -> Result<()> {
    let store = LivecraftHome::project_store()?;
    let project = resolve(&store, project).await?;

    let content =
        serde_json::to_string_pretty(&project.export()).context("Failed to serialize project")?;

    match out {
        Some(path) => {
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            println!(
                "{} Exported '{}' ({} files) to {}",
                "✓".green(),
                project.name,
                project.files.len(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
