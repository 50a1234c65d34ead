use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ryan_core::SystemKind;
use std::path::PathBuf;

mod bootstrap;
mod commands;
mod render;
mod telemetry;

#[derive(Parser)]
#[command(name = "ryan")]
#[command(about = "Ryan - AI software development agent (analyzer, planner, wireframe, developer)", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding project documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Keep projects in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a project
    New {
        name: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// List projects, most recently updated first
    List,
    /// Print a system's conversation and artifact
    Show {
        id: String,
        /// Defaults to the project's current system
        #[arg(long, short)]
        system: Option<SystemKind>,
    },
    /// Change a project's current system
    Switch { id: String, system: SystemKind },
    /// Send one message and print the reply
    Send {
        id: String,
        /// Defaults to the project's current system
        #[arg(long, short)]
        system: Option<SystemKind>,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Interactive conversation (new scratch project when no id is given)
    Chat { id: Option<String> },
    /// Rename a project or change its description
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = bootstrap::build(&cli.global)?;

    match cli.command {
        Commands::New { name, description } => commands::project::create(&app, &name, &description).await?,
        Commands::List => commands::project::list(&app).await,
        Commands::Show { id, system } => commands::project::show(&app, &id, system).await?,
        Commands::Switch { id, system } => commands::project::switch(&app, &id, system).await?,
        Commands::Send { id, system, text } => {
            commands::project::send(&app, &id, system, &text.join(" ")).await?
        }
        Commands::Chat { id } => commands::chat::run(&app, id.as_deref()).await?,
        Commands::Edit {
            id,
            name,
            description,
        } => commands::project::edit(&app, &id, name.as_deref(), description.as_deref()).await?,
        Commands::Delete { id } => commands::project::delete(&app, &id).await?,
    }

    Ok(())
}
