//! Preview command - synthesize the project and write the sandboxed page

use super::project::resolve;
use crate::config::LivecraftHome;
use anyhow::{Context, Result};
use colored::Colorize;
use livecraft_core::watcher::{WatchEvent, Watcher};
use livecraft_core::{
    AppConfig, ArtifactStore, JsonProjectStore, PreviewCompiler, PreviewState, SandboxHost,
    SandboxPolicy,
};
use std::path::{Path, PathBuf};

pub struct PreviewOptions {
    pub project: Option<String>,
    pub out: Option<PathBuf>,
    pub open: bool,
    pub watch: bool,
}

pub fn host_for(config: &AppConfig) -> SandboxHost {
    SandboxHost::new(
        PreviewCompiler::new(config.preview.clone()),
        SandboxPolicy::from_config(&config.sandbox),
    )
}

/// Default output path for a project's preview page
pub fn default_output(project_id: &str) -> Result<PathBuf> {
    Ok(LivecraftHome::preview_dir()?.join(format!("{}.html", project_id)))
}

/// Write the host's current page to `path`
pub async fn write_frame(host: &SandboxHost, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, host.frame_html())
        .await
        .with_context(|| format!("Failed to write preview to {:?}", path))?;
    Ok(())
}

/// One-line summary of the host state
pub fn describe(state: &PreviewState) -> String {
    match state {
        PreviewState::Idle => "idle".to_string(),
        PreviewState::Ready {
            document,
            generation,
        } => {
            let mut line = format!(
                "#{} entry {}",
                generation,
                document.entry.as_deref().unwrap_or("(none)")
            );
            if !document.diagnostics.is_empty() {
                line.push_str(&format!(", {} file(s) skipped", document.diagnostics.len()));
            }
            line
        }
        PreviewState::Failed {
            message,
            generation,
        } => format!("#{} failed: {}", generation, message),
    }
}

fn report(host: &SandboxHost, path: &Path) {
    match host.state() {
        PreviewState::Ready { document, .. } => {
            println!(
                "{} Preview {} -> {}",
                "✓".green(),
                describe(host.state()),
                path.display().to_string().dimmed()
            );
            for diagnostic in &document.diagnostics {
                println!(
                    "   {} {}: {}",
                    "⚠".yellow(),
                    diagnostic.path,
                    diagnostic.message
                );
            }
        }
        state => println!("{} Preview {}", "✗".red(), describe(state)),
    }
}

pub async fn run(options: PreviewOptions) -> Result<()> {
    let config = LivecraftHome::load_config()?;
    let store = LivecraftHome::project_store()?;
    let project = resolve(&store, options.project.as_deref()).await?;

    let out = match options.out {
        Some(path) => path,
        None => default_output(&project.id)?,
    };

    let mut host = host_for(&config);
    host.mount(&ArtifactStore::from_files(project.files.clone()));
    write_frame(&host, &out).await?;
    report(&host, &out);

    if options.open {
        if let Err(e) = webbrowser::open(&out.to_string_lossy()) {
            println!("{} Could not open browser: {}", "⚠".yellow(), e);
        }
    }

    if options.watch {
        watch(&store, &project.id, &mut host, &out).await?;
    }

    Ok(())
}

async fn watch(
    store: &JsonProjectStore,
    project_id: &str,
    host: &mut SandboxHost,
    out: &Path,
) -> Result<()> {
    let mut watcher = Watcher::new(store.path());
    watcher.start()?;
    println!(
        "{} Watching {} (Ctrl+C to stop)",
        "👀".cyan(),
        store.path().display().to_string().dimmed()
    );

    loop {
        let event = tokio::task::block_in_place(|| watcher.next_event());
        match event {
            Some(WatchEvent::Changed(_)) => {
                let project = resolve(store, Some(project_id)).await?;
                let before = host.generation();
                host.mount(&ArtifactStore::from_files(project.files));
                if host.generation() != before {
                    write_frame(host, out).await?;
                    report(host, out);
                }
            }
            Some(WatchEvent::Error(e)) => println!("{} Watch error: {}", "⚠".yellow(), e),
            None => break,
        }
    }

    watcher.stop();
    Ok(())
}
