//! Backup command - Upload new local content to Google Drive
//!
//! Provides the `drivebackup backup` CLI command which:
//! 1. Merges command-line overrides into the loaded configuration
//! 2. Reads the access token from the flag or the configured environment variable
//! 3. Creates the Drive adapter and the BackupEngine
//! 4. Runs the backup and displays the plan or the upload results

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use drivebackup_core::config::{Config, ConfigBuilder};
use drivebackup_drive::{DriveCatalog, DriveClient};
use drivebackup_sync::engine::{BackupEngine, BackupOptions, BackupReport};
use tracing::info;

use super::CommandContext;
use crate::output::{format_duration, get_formatter, plural, OutputFormatter};

#[derive(Debug, Args)]
pub struct BackupCommand {
    /// Directory whose top-level files are backed up
    #[arg(long, value_name = "DIR")]
    pub local_dir: Option<PathBuf>,

    /// Destination folder title (empty for the drive root)
    #[arg(long, value_name = "NAME")]
    pub remote_folder: Option<String>,

    /// Number of concurrent uploads
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Fail instead of creating a missing destination folder
    #[arg(long)]
    pub no_create_remote: bool,

    /// Show what would be uploaded without uploading or creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// OAuth access token (defaults to the variable named by auth.token_env)
    #[arg(long, value_name = "TOKEN")]
    pub access_token: Option<String>,
}

impl BackupCommand {
    /// Execute the backup command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let formatter = get_formatter(ctx.format);

        let config = match self.effective_config(&ctx.config) {
            Ok(config) => config,
            Err(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                formatter.error(&format!("Invalid configuration: {}", messages.join("; ")));
                return Ok(ExitCode::FAILURE);
            }
        };

        let Some(token) = resolve_token(self.access_token.as_deref(), &config.auth.token_env)
        else {
            formatter.error(&format!(
                "No access token. Pass --access-token or set {}.",
                config.auth.token_env
            ));
            return Ok(ExitCode::FAILURE);
        };

        let client = DriveClient::from_config(token, &config.drive);
        let engine = BackupEngine::from_config(Arc::new(DriveCatalog::new(client)), &config);

        let mut options = BackupOptions::from_config(&config);
        options.dry_run = self.dry_run;

        info!(
            local_dir = %options.local_dir.display(),
            folder = %options.remote_folder,
            dry_run = options.dry_run,
            "Running backup"
        );
        formatter.info(&format!(
            "Backing up {} to {}",
            options.local_dir.display(),
            destination_label(&options.remote_folder)
        ));

        match engine.run(&options).await {
            Ok(report) => {
                display_report(formatter.as_ref(), ctx.format.is_json(), &report);
                if report.failed() > 0 {
                    Ok(ExitCode::FAILURE)
                } else {
                    Ok(ExitCode::SUCCESS)
                }
            }
            Err(e) => {
                formatter.error(&format!("Backup failed: {e}"));
                Ok(ExitCode::FAILURE)
            }
        }
    }

    /// Applies command-line overrides on top of `base` and validates the result
    fn effective_config(
        &self,
        base: &Config,
    ) -> std::result::Result<Config, Vec<drivebackup_core::config::ValidationError>> {
        let mut builder = ConfigBuilder::from_config(base.clone());
        if let Some(dir) = &self.local_dir {
            builder = builder.backup_local_dir(dir.clone());
        }
        if let Some(folder) = &self.remote_folder {
            builder = builder.backup_remote_folder(folder.clone());
        }
        if let Some(workers) = self.workers {
            builder = builder.backup_workers(workers);
        }
        if self.no_create_remote {
            builder = builder.backup_create_remote(false);
        }

        let mut config = builder.build_validated()?;
        config.backup.local_dir = expand_home(&config.backup.local_dir);
        Ok(config)
    }
}

/// Token from the flag, else from `env_var`; empty values count as missing
fn resolve_token(flag: Option<&str>, env_var: &str) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|token| !token.trim().is_empty())
}

/// Expands a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

fn destination_label(folder: &str) -> String {
    if folder.trim().is_empty() {
        "the drive root".to_string()
    } else {
        format!("folder '{}'", folder.trim())
    }
}

fn display_report(formatter: &dyn OutputFormatter, json: bool, report: &BackupReport) {
    if json {
        formatter.print_json(&report_json(report));
        return;
    }

    let duration = format_duration(report.duration_ms);
    formatter.info(&format!(
        "Scanned {} locally, {} remotely",
        plural(report.scanned, "file"),
        plural(report.remote_files, "file")
    ));
    formatter.info(&format!("Skipped:  {} already backed up", plural(report.skipped, "file")));

    let Some(uploads) = &report.uploads else {
        formatter.success(&format!(
            "Dry run: {} would be uploaded",
            plural(report.planned.len(), "file")
        ));
        for record in &report.planned {
            formatter.info(&format!("  + {} ({} bytes)", record.display_name(), record.size()));
        }
        return;
    };

    if report.planned.is_empty() {
        formatter.success(&format!("Already up to date ({duration})"));
        return;
    }

    formatter.info(&format!("Uploaded: {}", plural(uploads.succeeded.len(), "file")));
    for file in &uploads.succeeded {
        formatter.info(&format!("  + {}", file.file_name));
    }

    if uploads.failed.is_empty() {
        formatter.success(&format!("Backup completed in {duration}"));
    } else {
        formatter.error(&format!(
            "{} failed to upload:",
            plural(uploads.failed.len(), "file")
        ));
        for failure in &uploads.failed {
            formatter.info(&format!("  - {}: {}", failure.file_name, failure.error));
        }
    }
}

fn report_json(report: &BackupReport) -> serde_json::Value {
    let planned: Vec<_> = report
        .planned
        .iter()
        .map(|r| {
            serde_json::json!({
                "file": r.display_name(),
                "size": r.size(),
                "md5": r.content_hash().as_str(),
            })
        })
        .collect();

    let (uploaded, failed) = match &report.uploads {
        Some(uploads) => (
            uploads
                .succeeded
                .iter()
                .map(|u| serde_json::json!({"file": u.file_name, "remote_id": u.remote_id}))
                .collect::<Vec<_>>(),
            uploads
                .failed
                .iter()
                .map(|f| serde_json::json!({"file": f.file_name, "error": f.error}))
                .collect::<Vec<_>>(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    serde_json::json!({
        "success": report.failed() == 0,
        "dry_run": report.is_dry_run(),
        "destination": report.destination.as_ref().map(|d| d.as_str()),
        "scanned": report.scanned,
        "remote_files": report.remote_files,
        "skipped": report.skipped,
        "planned": planned,
        "uploaded": uploaded,
        "failed": failed,
        "duration_ms": report.duration_ms,
        "finished_at": chrono::Utc::now().to_rfc3339(),
    })
}
