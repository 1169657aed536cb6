//! Config command - View and validate drivebackup configuration
//!
//! Provides the `drivebackup config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports every error
//! 3. Prints the configuration file location

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use drivebackup_core::config::{Config, ValidationError};
use tracing::info;

use super::CommandContext;
use crate::output::{get_formatter, plural, OutputFormatter};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let formatter = get_formatter(ctx.format);
        match self {
            ConfigCommand::Show => execute_show(ctx, formatter.as_ref()),
            ConfigCommand::Validate => Ok(execute_validate(ctx, formatter.as_ref())),
            ConfigCommand::Path => {
                if ctx.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "config_path": ctx.config_path.display().to_string(),
                        "exists": ctx.config_path.exists(),
                    }));
                } else {
                    println!("{}", ctx.config_path.display());
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn execute_show(ctx: &CommandContext, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    info!(config_path = %ctx.config_path.display(), "Showing configuration");

    if ctx.format.is_json() {
        let json = serde_json::to_value(&ctx.config)
            .context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
        formatter.info("");
        for line in ctx.config.to_yaml()?.lines() {
            formatter.info(line);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads the file strictly, so parse errors are reported instead of masked by defaults
fn load_for_validation(path: &Path) -> std::result::Result<Config, String> {
    if !path.exists() {
        return Err(format!(
            "Configuration file not found at {}; defaults are in use",
            path.display()
        ));
    }
    Config::load(path).map_err(|e| format!("{e:#}"))
}

fn execute_validate(ctx: &CommandContext, formatter: &dyn OutputFormatter) -> ExitCode {
    info!(config_path = %ctx.config_path.display(), "Validating configuration");

    let errors: Vec<String> = match load_for_validation(&ctx.config_path) {
        Ok(config) => config.validate().iter().map(ValidationError::to_string).collect(),
        Err(message) => vec![message],
    };

    if ctx.format.is_json() {
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": ctx.config_path.display().to_string(),
            "errors": errors,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", ctx.config_path.display()));
    } else {
        formatter.error(&format!("Configuration has {}:", plural(errors.len(), "error")));
        formatter.info(&format!("File: {}", ctx.config_path.display()));
        for error in &errors {
            formatter.info(&format!("  - {error}"));
        }
    }

    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
