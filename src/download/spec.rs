//! Per-cycle download settings.

use std::path::PathBuf;

use crate::config::{parse_handle, Config, ConversionProfile};
use crate::error::Result;
use crate::fs::account_folder;

/// Immutable snapshot of the settings one cycle runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    /// Normalised creator handle (no leading `@`).
    pub account: String,

    /// Base download directory; each account gets a subfolder.
    pub destination: PathBuf,

    /// Maximum number of recent items listed.
    pub limit: u32,

    /// Format selector passed to the fetch tool.
    pub format_selector: String,

    /// Post-download conversion, if any.
    pub conversion: Option<ConversionProfile>,

    pub write_metadata: bool,
    pub write_thumbnail: bool,
    pub verify_certificates: bool,
}

impl DownloadSpec {
    /// Snapshot the download-relevant parts of a config.
    pub fn from_config(config: &Config, destination: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            account: parse_handle(&config.target.username)?,
            destination: destination.into(),
            limit: config.options.video_limit,
            format_selector: config.options.quality.format_selector().to_string(),
            conversion: config.options.conversion.profile(),
            write_metadata: config.options.save_metadata,
            write_thumbnail: config.options.save_thumbnails,
            verify_certificates: !config.options.bypass_ssl,
        })
    }

    /// The same settings for a different account.
    pub fn for_account(mut self, account: &str) -> Self {
        self.account = account.to_string();
        self
    }

    /// Folder this spec's downloads land in.
    pub fn account_folder(&self) -> Result<PathBuf> {
        account_folder(&self.destination, &self.account)
    }
}
