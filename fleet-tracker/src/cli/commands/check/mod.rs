//! `check` - probe the workbook source

mod handler;

use clap::Args;

use super::SourceArgs;

pub use handler::handle_check_command;

#[derive(Args, Debug, Clone)]
pub struct CheckCommands {
    #[command(flatten)]
    pub source: SourceArgs,
}
