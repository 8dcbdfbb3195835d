//! Subcommands and the arguments they share

pub mod check;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::{Config, default_config_path};
use crate::source::Source;

/// Where to read the workbook from; falls back to `source.url` in the config
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Workbook URL (e.g. a shared-link download)
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Local workbook file (.xlsx, .xls or .ods)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl SourceArgs {
    pub fn resolve(&self, config: &Config) -> Result<Source> {
        if let Some(url) = &self.url {
            return Ok(Source::Url(url.trim().to_string()));
        }
        if let Some(path) = &self.file {
            return Ok(Source::File(path.clone()));
        }
        match &config.source.url {
            Some(location) if !location.trim().is_empty() => Ok(Source::parse(location)),
            _ => anyhow::bail!(
                "No workbook source configured. Pass --url or --file, or set source.url in {}",
                default_config_path().display()
            ),
        }
    }
}
