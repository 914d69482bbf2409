//! ImageGallery - headless host for the gallery core
//!
//! Drives every gallery operation from the command line and prints JSON.

mod cli;

use anyhow::{bail, Result};
use app_core::{Gallery, GalleryConfig};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    let cli = cli::Cli::parse();

    // Load configuration
    let mut config = GalleryConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
        GalleryConfig::default()
    });

    if let Err(e) = app_log::cleanup_old_logs(config.log.retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    let root = match (&cli.root, &config.gallery.root) {
        (Some(root), _) => root.clone(),
        (None, Some(root)) => root.clone(),
        (None, None) => bail!("No gallery root configured; pass --root <dir>"),
    };

    if cli.root.is_some() && config.gallery.root.as_ref() != Some(&root) {
        config.gallery.root = Some(root.clone());
        if let Err(e) = config.save() {
            tracing::warn!("Failed to remember gallery root: {}", e);
        }
    }

    let gallery = Gallery::new(root);
    if config.gallery.create_root_if_missing && !gallery.root_exists().await {
        gallery.ensure_root().await?;
    }

    tracing::debug!("Running {:?}", cli.command);
    let (output, success) = cli::execute(&gallery, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
