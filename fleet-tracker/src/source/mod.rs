//! Where the trip workbook comes from
//!
//! A source is either an HTTP(S) URL (typically a shared-link download) or a
//! local file. Fetching is a single attempt: no retry, no caching. Any failure
//! here is fatal for the run because no rows exist yet.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::excel::{DecodedSheet, WorkbookError, decode_workbook};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Location of the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Treat `http://` and `https://` as URLs, anything else as a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// HTTP client settings for URL sources
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Failure to obtain the raw rows
#[derive(Debug)]
pub enum SourceError {
    /// Transport-level failure (DNS, TLS, timeout, ...)
    Http(reqwest::Error),
    /// Server answered with a non-success status
    Status(u16),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Workbook(WorkbookError),
    /// Download succeeded but the body was empty
    EmptyWorkbook,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Http(e) => write!(f, "HTTP request failed: {}", e),
            SourceError::Status(code) => write!(f, "HTTP error! status: {}", code),
            SourceError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            SourceError::Workbook(e) => write!(f, "{}", e),
            SourceError::EmptyWorkbook => write!(f, "Downloaded workbook is empty"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Http(e) => Some(e),
            SourceError::Io { source, .. } => Some(source),
            SourceError::Workbook(e) => Some(e),
            SourceError::Status(_) | SourceError::EmptyWorkbook => None,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(e)
    }
}

impl From<WorkbookError> for SourceError {
    fn from(e: WorkbookError) -> Self {
        SourceError::Workbook(e)
    }
}

fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .build()?)
}

/// Download or read the raw workbook bytes
pub async fn fetch_workbook(
    source: &Source,
    settings: &HttpSettings,
) -> Result<Vec<u8>, SourceError> {
    let bytes = match source {
        Source::Url(url) => {
            log::info!("Fetching workbook from {}", url);
            let client = build_client(settings)?;
            let response = client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status(status.as_u16()));
            }
            response.bytes().await?.to_vec()
        }
        Source::File(path) => {
            log::info!("Reading workbook from {}", path.display());
            read_file(path).await?
        }
    };

    if bytes.is_empty() {
        return Err(SourceError::EmptyWorkbook);
    }

    log::debug!("Workbook size: {} bytes", bytes.len());
    Ok(bytes)
}

async fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetch and decode the first sheet
pub async fn load_sheet(
    source: &Source,
    settings: &HttpSettings,
) -> Result<DecodedSheet, SourceError> {
    let bytes = fetch_workbook(source, settings).await?;
    // Decoding is CPU-bound; keep it off the async workers
    let sheet = tokio::task::spawn_blocking(move || decode_workbook(bytes))
        .await
        .map_err(|e| SourceError::Io {
            path: PathBuf::from(source.to_string()),
            source: std::io::Error::other(e),
        })??;
    Ok(sheet)
}

/// Whether the source answers at all. Never fails; errors read as unreachable.
pub async fn check_source(source: &Source, settings: &HttpSettings) -> bool {
    match source {
        Source::Url(url) => {
            let client = match build_client(settings) {
                Ok(client) => client,
                Err(e) => {
                    log::warn!("Could not build HTTP client: {}", e);
                    return false;
                }
            };
            match client.head(url).send().await {
                Ok(response) => {
                    log::debug!("HEAD {} -> {}", url, response.status());
                    response.status().is_success()
                }
                Err(e) => {
                    log::warn!("HEAD {} failed: {}", url, e);
                    false
                }
            }
        }
        Source::File(path) => tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false),
    }
}
