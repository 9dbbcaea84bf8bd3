//! Project management commands

use crate::config::LivecraftHome;
use anyhow::Result;
use colored::Colorize;
use livecraft_core::starter::new_project;
use livecraft_core::ProjectRepository;
use livecraft_types::Project;

pub async fn create(name: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => dialoguer::Input::new()
            .with_prompt("Project name")
            .default("New Project".to_string())
            .interact_text()?,
    };

    let store = LivecraftHome::project_store()?;
    let project = new_project(name.trim());
    store.upsert(&project).await?;

    println!("{} Created project '{}'", "✓".green(), project.name.cyan());
    println!("   Id: {}", project.id.dimmed());
    println!(
        "   Start with: {}",
        format!("livecraft chat -p {} \"...\"", short_id(&project.id)).dimmed()
    );
    Ok(())
}

pub async fn list() -> Result<()> {
    let store = LivecraftHome::project_store()?;
    let projects = store.list().await?;

    println!("{}", "📁 Projects".blue().bold());
    println!();

    if projects.is_empty() {
        println!("   (No projects yet)");
        println!();
        println!("   Create one with: {}", "livecraft new".dimmed());
        return Ok(());
    }

    for project in &projects {
        println!(
            "   {} {} - {} files, {} messages",
            short_id(&project.id).yellow(),
            project.name.cyan(),
            project.files.len(),
            project.messages.len()
        );
        println!(
            "       Created: {}",
            project.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
    Ok(())
}

pub async fn delete(id: &str, yes: bool) -> Result<()> {
    let store = LivecraftHome::project_store()?;
    let project = resolve(&store, Some(id)).await?;

    if !yes {
        let confirm: bool = dialoguer::Confirm::new()
            .with_prompt(format!("Delete project '{}'?", project.name))
            .default(false)
            .interact()?;

        if !confirm {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    store.delete(&project.id).await?;
    println!("{} Deleted project '{}'", "✓".green(), project.name);
    Ok(())
}

/// Find a project by id or unique id prefix; the most recent one when no
/// id is given.
pub async fn resolve(store: &impl ProjectRepository, id: Option<&str>) -> Result<Project> {
    let projects = store.list().await?;

    let Some(id) = id else {
        return projects
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No projects yet. Create one with 'livecraft new'"));
    };

    if let Some(project) = projects.iter().find(|p| p.id == id) {
        return Ok(project.clone());
    }

    let mut matches = projects.into_iter().filter(|p| p.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project),
        (Some(_), Some(_)) => anyhow::bail!("Project id '{}' is ambiguous", id),
        (None, _) => anyhow::bail!("Project '{}' not found", id),
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
