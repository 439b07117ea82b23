//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::presets::{ConversionPreset, QualityPreset};
use crate::error::{Error, Result};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "tikstalk.toml";

/// Default state file name.
pub const STATE_FILE_NAME: &str = "tikstalk_state.json";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub state: StateConfig,
}

/// Creator targeting configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Creator handle, with or without a leading `@`.
    #[serde(default)]
    pub username: String,
}

/// Download options configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Maximum number of recent videos listed per cycle.
    #[serde(default = "default_video_limit")]
    pub video_limit: u32,

    /// Format selector preset.
    #[serde(default)]
    pub quality: QualityPreset,

    /// Post-download conversion preset.
    #[serde(default)]
    pub conversion: ConversionPreset,

    /// Minutes between monitoring cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u32,

    /// Skip TLS certificate verification in the fetch tool.
    #[serde(default = "default_true")]
    pub bypass_ssl: bool,

    /// Write a `.info.json` metadata sidecar per video.
    #[serde(default = "default_true")]
    pub save_metadata: bool,

    /// Write a thumbnail image per video.
    #[serde(default = "default_true")]
    pub save_thumbnails: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            video_limit: default_video_limit(),
            quality: QualityPreset::default(),
            conversion: ConversionPreset::default(),
            check_interval_minutes: default_check_interval(),
            bypass_ssl: true,
            save_metadata: true,
            save_thumbnails: true,
        }
    }
}

/// External tool locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_yt_dlp")]
    pub yt_dlp: PathBuf,

    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: default_yt_dlp(),
            ffmpeg: default_ffmpeg(),
        }
    }
}

/// Seen-set persistence configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// State file path. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_video_limit() -> u32 {
    50
}

fn default_check_interval() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_yt_dlp() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tikstalk")
}

/// Default config file location (platform config dir, else working dir).
pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Default state file location (platform data dir, else working dir).
pub fn default_state_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory.
    ///
    /// Falls back to the folder remembered in the state file, then to
    /// `Downloads` under the working directory.
    pub fn download_directory(&self, remembered: Option<&Path>) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .or_else(|| remembered.map(Path::to_path_buf))
            .unwrap_or_else(|| {
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("Downloads")
            })
    }

    /// Get the effective state file path.
    pub fn state_path(&self) -> PathBuf {
        self.state.path.clone().unwrap_or_else(default_state_path)
    }
}
