//! dialectid CLI - classify competing dialect transcriptions and score the result

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialectid_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "dialectid")]
#[command(version)]
#[command(
    about = "Decide which dialect transcription fits each recording, then score the decisions",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every utterance and organize its audio by decision
    Classify,

    /// Score the classification lists against the ground-truth directories
    Score,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify => commands::classify::run(&config),

        Commands::Score => commands::score::run(&config),

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::show_path(),
        },
    }
}
