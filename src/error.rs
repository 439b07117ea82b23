//! Error types for the tikstalk application.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Cycle errors
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    // Worker errors
    #[error("Worker busy: {0}")]
    WorkerBusy(&'static str),

    #[error("Reset was not confirmed")]
    ResetNotConfirmed,

    #[error("Monitoring task ended abnormally: {0}")]
    WorkerFailed(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::CONFIG_ERROR,
            Error::Listing(_) => exit_codes::LISTING_ERROR,
            Error::Download(_) | Error::Conversion(_) => exit_codes::DOWNLOAD_ERROR,
            Error::ResetNotConfirmed => exit_codes::ABORT,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to enumerate a creator's items. Aborts the whole cycle.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Timed out getting video list after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to get video list: {0}")]
    ToolFailure(String),
}

/// Why a single item download failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFailure {
    Timeout,
    ToolFailure,
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadFailure::Timeout => write!(f, "timeout"),
            DownloadFailure::ToolFailure => write!(f, "tool failure"),
        }
    }
}

/// Failure to download one item. Only that item is skipped.
#[derive(Error, Debug)]
#[error("Download failed ({reason}): {detail}")]
pub struct DownloadError {
    pub reason: DownloadFailure,
    pub detail: String,
}

impl DownloadError {
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self {
            reason: DownloadFailure::Timeout,
            detail: detail.into(),
        }
    }

    pub fn tool_failure(detail: impl Into<String>) -> Self {
        Self {
            reason: DownloadFailure::ToolFailure,
            detail: detail.into(),
        }
    }
}

/// Failure to transcode a downloaded file. The raw file is kept.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Conversion failed: {0}")]
    ToolFailure(String),

    #[error("Conversion output missing: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Conversion IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to read or write the persisted seen-set.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse state file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const LISTING_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
