//! Check command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use super::CheckCommands;
use crate::config::Config;
use crate::source::check_source;

/// Returns whether the source answered
pub async fn handle_check_command(args: CheckCommands, config_path: Option<&Path>) -> Result<bool> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let source = args.source.resolve(&config)?;

    let reachable = check_source(&source, &config.source.http_settings()).await;
    if reachable {
        println!("{} {}", "✓".green().bold(), source);
    } else {
        println!("{} {} is not reachable", "✗".red().bold(), source);
    }
    Ok(reachable)
}
