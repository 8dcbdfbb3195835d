//! `sync` - run the ingestion pipeline once

mod handler;

use std::path::PathBuf;

use clap::Args;

use super::SourceArgs;
use crate::output::OutputFormat;

pub use handler::{handle_sync_command, run_pipeline};

#[derive(Args, Debug, Clone)]
pub struct SyncCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Carrier/facility reference file replacing the built-in tables
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Output format (defaults to output.format from the config)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the per-route dashboard summary instead of the vehicle list
    #[arg(long)]
    pub summary: bool,

    /// Print the per-row diagnostics trail to stderr
    #[arg(long)]
    pub diagnostics: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
