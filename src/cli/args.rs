//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, ConversionPreset, QualityPreset};

/// TikTok creator downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tikstalk",
    version,
    about = "Keep a local copy of a TikTok creator's videos",
    long_about = "Lists a creator's recent videos with yt-dlp, downloads the ones not fetched before \
                  and optionally converts them with ffmpeg.\n\n\
                  Run once with `download`, or keep polling with `monitor`."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Path to configuration file.
    #[arg(short, long, env = "TIKSTALK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a single cycle and exit.
    Download,

    /// Poll the creator until interrupted with Ctrl-C.
    Monitor {
        /// Minutes between checks (1-60).
        #[arg(short, long)]
        interval: Option<u32>,
    },

    /// Forget which videos were already downloaded.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Report whether yt-dlp and ffmpeg can be run.
    Check,
}

/// Flags that override configuration file values.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Creator handle, @handle or profile URL.
    #[arg(short, long, env = "TIKSTALK_USER", global = true)]
    pub user: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory", global = true)]
    pub download_directory: Option<PathBuf>,

    /// Number of recent videos to check (1-500).
    #[arg(short = 'n', long, global = true)]
    pub limit: Option<u32>,

    /// Quality preset: best, best-mp4, 720p, 480p or audio.
    #[arg(short, long, global = true)]
    pub quality: Option<QualityPreset>,

    /// Conversion preset: none, mp4, compress or mp3.
    #[arg(long, global = true)]
    pub conversion: Option<ConversionPreset>,

    /// Verify TLS certificates when fetching.
    #[arg(long, global = true)]
    pub verify_ssl: bool,

    /// Don't write .info.json metadata files.
    #[arg(long, global = true)]
    pub no_metadata: bool,

    /// Don't write thumbnail images.
    #[arg(long, global = true)]
    pub no_thumbnails: bool,

    /// Path to the yt-dlp executable.
    #[arg(long, env = "TIKSTALK_YT_DLP", global = true)]
    pub yt_dlp: Option<PathBuf>,

    /// Path to the ffmpeg executable.
    #[arg(long, env = "TIKSTALK_FFMPEG", global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the download history file.
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(user) = &self.user {
            config.target.username = user.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(limit) = self.limit {
            config.options.video_limit = limit;
        }

        if let Some(quality) = self.quality {
            config.options.quality = quality;
        }

        if let Some(conversion) = self.conversion {
            config.options.conversion = conversion;
        }

        // Boolean flags (only override if set to non-default)
        if self.verify_ssl {
            config.options.bypass_ssl = false;
        }

        if self.no_metadata {
            config.options.save_metadata = false;
        }

        if self.no_thumbnails {
            config.options.save_thumbnails = false;
        }

        if let Some(path) = &self.yt_dlp {
            config.tools.yt_dlp = path.clone();
        }

        if let Some(path) = &self.ffmpeg {
            config.tools.ffmpeg = path.clone();
        }

        if let Some(path) = &self.state_file {
            config.state.path = Some(path.clone());
        }
    }
}
