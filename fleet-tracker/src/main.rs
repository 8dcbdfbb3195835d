use std::process::ExitCode;

use clap::Parser;

use fleet_tracker::cli::commands::check::handle_check_command;
use fleet_tracker::cli::commands::sync::handle_sync_command;
use fleet_tracker::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    log::debug!("fleet-tracker v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Sync(args) => {
            handle_sync_command(args, config_path).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(args) => {
            if handle_check_command(args, config_path).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
