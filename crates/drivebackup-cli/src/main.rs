//! drivebackup CLI - One-way backup of a local directory to Google Drive
//!
//! Provides commands for:
//! - Backing up the top-level files of a directory
//! - Viewing and validating the configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drivebackup_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{backup::BackupCommand, config::ConfigCommand, CommandContext};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "drivebackup",
    version,
    about = "Back up a local directory to Google Drive"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload every local file whose content is missing remotely
    Backup(BackupCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Filter directive for the given `-v` count, or the configured level
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn init_tracing(verbose: u8, json: bool, configured: &str) {
    let env_filter = if verbose > 0 {
        EnvFilter::new(log_filter(verbose, configured))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose, configured)))
    };

    // stdout carries command output; logs go to stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config_path, config) = match cli.config {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            (path, config)
        }
        None => {
            let path = Config::default_path();
            let config = Config::load_or_default(&path);
            (path, config)
        }
    };

    init_tracing(cli.verbose, cli.json, &config.logging.level);
    tracing::debug!(config_path = %config_path.display(), "Loaded configuration");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = CommandContext {
        format,
        config_path,
        config,
    };

    match cli.command {
        Commands::Backup(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
    }
}
