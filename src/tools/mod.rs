//! External tool adapters.
//!
//! The downloader never talks to the platform itself. Listing and fetching go
//! through `yt-dlp`, transcoding through `ffmpeg`. Each concern sits behind a
//! trait so the cycle logic can run against other implementations.

pub mod ffmpeg;
pub mod process;
pub mod ytdlp;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConversionProfile;
use crate::error::{ConversionError, DownloadError, ListingError};
use crate::media::RemoteItem;

pub use ffmpeg::Ffmpeg;
pub use process::{run_tool, ToolError, ToolOutput};
pub use ytdlp::YtDlp;

/// Everything the fetch tool needs for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub account: String,
    pub item_id: String,
    pub format_selector: String,
    /// Destination path with a `%(ext)s` placeholder for the extension.
    pub output_template: PathBuf,
    pub verify_certificates: bool,
    pub write_metadata: bool,
    pub write_thumbnail: bool,
}

/// Enumerates a creator's recent items.
#[async_trait]
pub trait RemoteLister: Send + Sync {
    async fn list(
        &self,
        account: &str,
        limit: u32,
        verify_certificates: bool,
    ) -> Result<Vec<RemoteItem>, ListingError>;
}

/// Fetches one item to local storage.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<(), DownloadError>;
}

/// Converts a local media file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &ConversionProfile,
    ) -> Result<(), ConversionError>;
}

/// The three tool seams a cycle runs against.
#[derive(Clone)]
pub struct Toolset {
    pub lister: Arc<dyn RemoteLister>,
    pub fetcher: Arc<dyn Fetcher>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Toolset {
    /// Listing and fetching through yt-dlp, conversion through ffmpeg.
    pub fn external(yt_dlp: YtDlp, ffmpeg: Ffmpeg) -> Self {
        let yt_dlp = Arc::new(yt_dlp);
        Self {
            lister: yt_dlp.clone(),
            fetcher: yt_dlp,
            transcoder: Arc::new(ffmpeg),
        }
    }
}
