//! Livecraft CLI
//!
//! Chat with a model that writes project files, then preview them in a
//! sandboxed frame.

mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "livecraft")]
#[command(author, version, about = "Livecraft - build projects by chatting, preview them live", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project seeded with the starter files
    New {
        /// Project name (prompted when omitted)
        name: Option<String>,
    },

    /// List saved projects
    Projects,

    /// Delete a project
    Delete {
        /// Project id (or a unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Send a prompt, or start an interactive session without one
    Chat {
        /// Project id (defaults to the most recent project)
        #[arg(short, long)]
        project: Option<String>,

        /// Prompt text
        prompt: Option<String>,

        /// Model override
        #[arg(short, long, env = "LIVECRAFT_MODEL")]
        model: Option<String>,
    },

    /// Print the project's file tree
    Tree {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Write the sandboxed preview page
    Preview {
        #[arg(short, long)]
        project: Option<String>,

        /// Output file (defaults to the Livecraft home preview directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the page in the default browser
        #[arg(long)]
        open: bool,

        /// Re-synthesize whenever the saved project changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Export a project as JSON
    Export {
        #[arg(short, long)]
        project: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default livecraft.config.yaml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "livecraft_cli=debug,livecraft_core=debug"
        } else {
            "livecraft_cli=info,livecraft_core=warn"
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    info!("Starting Livecraft CLI");

    let result = match cli.command {
        Commands::New { name } => commands::project::create(name).await,
        Commands::Projects => commands::project::list().await,
        Commands::Delete { id, yes } => commands::project::delete(&id, yes).await,
        Commands::Chat {
            project,
            prompt,
            model,
        } => commands::chat::run(project.as_deref(), prompt, model).await,
        Commands::Tree { project } => commands::tree::run(project.as_deref()).await,
        Commands::Preview {
            project,
            out,
            open,
            watch,
        } => {
            commands::preview::run(commands::preview::PreviewOptions {
                project,
                out,
                open,
                watch,
            })
            .await
        }
        Commands::Export { project, out } => commands::export::run(project.as_deref(), out).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::Init { force } => commands::config::init(force).await,
        },
    };

    if let Err(ref e) = result {
        error!("Command failed: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
