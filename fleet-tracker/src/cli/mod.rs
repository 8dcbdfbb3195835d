//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::check::CheckCommands;
use commands::sync::SyncCommands;

#[derive(Parser)]
#[command(name = "fleet-tracker")]
#[command(about = "Normalize the freight trip spreadsheet into vehicle records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/fleet-tracker/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the workbook and print the normalized vehicles
    Sync(SyncCommands),
    /// Check that the workbook source is reachable
    Check(CheckCommands),
}
