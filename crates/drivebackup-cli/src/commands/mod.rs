//! CLI subcommands

use std::path::PathBuf;

use drivebackup_core::config::Config;

use crate::output::OutputFormat;

pub mod backup;
pub mod config;

/// State shared by every command: output format and the loaded configuration
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub config_path: PathBuf,
    pub config: Config,
}
