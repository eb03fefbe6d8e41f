//! Estate CLI - command-line interface for Estate Vision

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, history, init, providers};

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Generate real-estate marketing packages with AI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the .estate workspace in the current directory
    Init,

    /// Run the generation pipeline for a property topic
    Generate {
        /// Property description (e.g. "Penthouse Saigon Pearl")
        topic: String,

        /// Video resolution: 720p or 1080p
        #[arg(long)]
        resolution: Option<String>,

        /// Thumbnail style (Luxury, Modern, Classic, ...)
        #[arg(long)]
        style: Option<String>,

        /// Generation backend (gemini, mock)
        #[arg(long)]
        provider: Option<String>,

        /// Media files to show alongside the generated assets
        #[arg(long)]
        attach: Vec<String>,
    },

    /// Browse archived sessions
    #[command(subcommand)]
    History(history::HistoryCommands),

    /// Show generation backend status
    Providers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init::run(),
        Commands::Generate {
            topic,
            resolution,
            style,
            provider,
            attach,
        } => generate::run(generate::GenerateArgs {
            topic,
            resolution,
            style,
            provider,
            attach,
        }),
        Commands::History(cmd) => history::run(cmd),
        Commands::Providers => providers::run(),
    }
}
