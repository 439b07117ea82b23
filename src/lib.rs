//! tikstalk - keep a local copy of a TikTok creator's videos
//!
//! This library polls a creator's recent uploads and downloads the ones it has
//! not fetched before.
//!
//! # Features
//!
//! - Listing and fetching through `yt-dlp`
//! - Optional post-download conversion through `ffmpeg`
//! - Persistent download history keyed by a hash of video id and title
//! - One-shot downloads or interval monitoring with cooperative cancellation
//! - Progress events for frontends
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tikstalk::{
//!     dedup::SeenSetStore,
//!     download::{CycleRunner, DownloadSpec, EventSink},
//!     tools::{Ffmpeg, Toolset, YtDlp},
//!     Config,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("tikstalk.toml"))?;
//!     let store = SeenSetStore::new(config.state_path());
//!     let seen = store.load();
//!
//!     let tools = Toolset::external(YtDlp::default(), Ffmpeg::default());
//!     let mut runner = CycleRunner::new(tools, store, seen, EventSink::disconnected());
//!
//!     let spec = DownloadSpec::from_config(&config, config.download_directory(None))?;
//!     let summary = runner.run_cycle(&spec).await?;
//!     println!("{} new videos", summary.succeeded);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod tools;

// Re-exports for convenience
pub use config::{Config, ConversionPreset, QualityPreset};
pub use dedup::{hash_item, DedupKey, SeenSet, SeenSetStore};
pub use download::{CycleRunner, CycleSummary, DownloadSpec, MonitorStats, Worker};
pub use error::{Error, Result};
pub use media::RemoteItem;
