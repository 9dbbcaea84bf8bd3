//! Chat command - stream a turn from the relay into the project

use super::preview::{default_output, describe, host_for, write_frame};
use super::project::resolve;
use super::tree::render_tree;
use crate::api::Client;
use crate::config::LivecraftHome;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use livecraft_core::{AppConfig, CoreError, JsonProjectStore, Pipeline, ProjectRepository};
use livecraft_types::{ArtifactDiffInfo, ChatRequest, Message, Project};
use std::time::Duration;

/// Interactive session input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Prompt(&'a str),
    Undo,
    Tree,
    Remove(&'a str),
    Rename(&'a str, &'a str),
    Preview,
    Quit,
    Help,
    Empty,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if !line.starts_with('/') {
        return Command::Prompt(line);
    }

    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();
    match (head, args.as_slice()) {
        ("/undo", []) => Command::Undo,
        ("/tree", []) => Command::Tree,
        ("/rm", [path]) => Command::Remove(*path),
        ("/mv", [path, name]) => Command::Rename(*path, *name),
        ("/preview", []) => Command::Preview,
        ("/quit" | "/exit", []) => Command::Quit,
        ("/help", _) => Command::Help,
        _ => Command::Unknown(line),
    }
}

struct Session {
    config: AppConfig,
    client: Client,
    store: JsonProjectStore,
    project: Project,
    pipeline: Pipeline,
    model: String,
}

impl Session {
    async fn save(&mut self) -> Result<()> {
        self.pipeline.apply_to(&mut self.project);
        self.store.upsert(&self.project).await?;
        Ok(())
    }

    /// Stream one turn, then merge and persist it
    async fn turn(&mut self, prompt: &str) -> Result<()> {
        let user = Message::user(prompt);
        let mut transcript = self.pipeline.messages().to_vec();
        transcript.push(user.clone());
        let request = ChatRequest::from_transcript(&transcript, Some(self.model.clone()));

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let stream = match self.client.stream_chat(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                spinner.finish_and_clear();
                tracing::debug!(endpoint = %self.client.endpoint(), "Relay unreachable");
                self.pipeline.begin_turn(user)?;
                self.pipeline
                    .fail_turn(&CoreError::Transport(format!("{:#}", e)))?;
                self.save().await?;
                println!("{} {:#}", "✗".red(), e);
                return Ok(());
            }
        };

        let result = self
            .pipeline
            .run_turn(user, stream, |_, live| {
                spinner.set_message(progress_message(live));
            })
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => {
                if !outcome.prose.is_empty() {
                    println!("{}", outcome.prose);
                }
                print_diffs(&outcome.diffs);
            }
            Err(e) => println!("{} {}", "✗".red(), e),
        }

        self.save().await
    }

    async fn preview(&self) -> Result<()> {
        let mut host = host_for(&self.config);
        host.mount(self.pipeline.store());
        let out = default_output(&self.project.id)?;
        write_frame(&host, &out).await?;
        println!(
            "{} Preview {} -> {}",
            "✓".green(),
            describe(host.state()),
            out.display().to_string().dimmed()
        );
        Ok(())
    }

    /// Returns `false` when the session should end
    async fn handle(&mut self, line: &str) -> Result<bool> {
        match parse_command(line) {
            Command::Prompt(prompt) => self.turn(prompt).await?,
            Command::Undo => {
                if self.pipeline.undo()? {
                    self.save().await?;
                    println!("{} Reverted last change", "↶".green());
                } else {
                    println!("{}", "Nothing to undo".dimmed());
                }
            }
            Command::Tree => print!("{}", render_tree(&self.pipeline.file_tree())),
            Command::Remove(path) => {
                let removed = self.pipeline.delete_path(path)?;
                if removed.is_empty() {
                    println!("{}", format!("No file or folder at '{}'", path).dimmed());
                } else {
                    self.save().await?;
                    println!("{} Removed {} file(s)", "✓".green(), removed.len());
                }
            }
            Command::Rename(path, name) => match self.pipeline.rename_path(path, name) {
                Ok(0) => println!("{}", "Name unchanged".dimmed()),
                Ok(moved) => {
                    self.save().await?;
                    println!("{} Renamed {} file(s)", "✓".green(), moved);
                }
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            Command::Preview => self.preview().await?,
            Command::Quit => return Ok(false),
            Command::Help => print_help(),
            Command::Empty => {}
            Command::Unknown(line) => {
                println!("{} Unknown command: {}", "⚠".yellow(), line);
                print_help();
            }
        }
        Ok(true)
    }
}

fn progress_message(live: &[ArtifactDiffInfo]) -> String {
    match live.last() {
        Some(current) => format!(
            "Generating... {} file(s) changed, writing {}",
            live.len(),
            current.path
        ),
        None => "Generating...".to_string(),
    }
}

fn print_diffs(diffs: &[ArtifactDiffInfo]) {
    for diff in diffs {
        let marker = if diff.is_new {
            "+ new".green()
        } else {
            "~ mod".yellow()
        };
        println!(
            "   {} {} {}",
            marker,
            diff.path,
            format!("({} lines)", diff.lines_added).dimmed()
        );
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("   /undo              revert the last change");
    println!("   /tree              show the file tree");
    println!("   /rm <path>         delete a file or folder");
    println!("   /mv <path> <name>  rename a file or folder");
    println!("   /preview           write the preview page");
    println!("   /quit              leave the session");
}

pub async fn run(
    project_id: Option<&str>,
    prompt: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let config = LivecraftHome::load_config()?;
    let store = LivecraftHome::project_store()?;
    let project = resolve(&store, project_id).await?;
    let pipeline = Pipeline::from_project(&project, config.history_limit);

    let mut session = Session {
        client: Client::new(config.endpoint.clone()),
        model: model.unwrap_or_else(|| config.model.clone()),
        config,
        store,
        project,
        pipeline,
    };

    if let Some(prompt) = prompt {
        return session.turn(&prompt).await;
    }

    println!(
        "{} {} {}",
        "💬".cyan(),
        session.project.name.cyan().bold(),
        "(/help for commands)".dimmed()
    );

    loop {
        let line: String = dialoguer::Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()?;

        match session.handle(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command("make a todo app"), Command::Prompt("make a todo app"));
        assert_eq!(parse_command("/undo"), Command::Undo);
        assert_eq!(parse_command("/tree"), Command::Tree);
        assert_eq!(parse_command("/rm src/old"), Command::Remove("src/old"));
        assert_eq!(
            parse_command("/mv src/a.tsx b.tsx"),
            Command::Rename("src/a.tsx", "b.tsx")
        );
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/rm"), Command::Unknown("/rm"));
        assert_eq!(parse_command("/deploy now"), Command::Unknown("/deploy now"));
    }

    #[test]
    fn test_progress_message_names_latest_file() {
        assert_eq!(progress_message(&[]), "Generating...");
        let live = vec![
            ArtifactDiffInfo {
                path: "App.tsx".to_string(),
                lines_added: 3,
                is_new: false,
                content: String::new(),
            },
            ArtifactDiffInfo {
                path: "Button.tsx".to_string(),
                lines_added: 1,
                is_new: true,
                content: String::new(),
            },
        ];
        assert_eq!(
            progress_message(&live),
            "Generating... 2 file(s) changed, writing Button.tsx"
        );
    }
}
