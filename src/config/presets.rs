//! Quality and conversion preset catalogs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Format selector presets passed to the fetch tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityPreset {
    /// Best available format.
    Best,
    /// Best MP4, falling back to best overall (default).
    #[default]
    BestMp4,
    /// MP4 up to 720p.
    #[serde(rename = "720p")]
    Mp4720,
    /// MP4 up to 480p.
    #[serde(rename = "480p")]
    Mp4480,
    /// Audio track only.
    Audio,
}

impl QualityPreset {
    /// Format selector understood by the fetch tool.
    pub fn format_selector(&self) -> &'static str {
        match self {
            QualityPreset::Best => "best",
            QualityPreset::BestMp4 => "best[ext=mp4]/best",
            QualityPreset::Mp4720 => "best[height<=720][ext=mp4]/best[ext=mp4]",
            QualityPreset::Mp4480 => "best[height<=480][ext=mp4]/best[ext=mp4]",
            QualityPreset::Audio => "bestaudio",
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityPreset::Best => write!(f, "best"),
            QualityPreset::BestMp4 => write!(f, "best-mp4"),
            QualityPreset::Mp4720 => write!(f, "720p"),
            QualityPreset::Mp4480 => write!(f, "480p"),
            QualityPreset::Audio => write!(f, "audio"),
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" => Ok(QualityPreset::Best),
            "best-mp4" => Ok(QualityPreset::BestMp4),
            "720p" => Ok(QualityPreset::Mp4720),
            "480p" => Ok(QualityPreset::Mp4480),
            "audio" => Ok(QualityPreset::Audio),
            _ => Err(format!("Unknown quality preset: {}", s)),
        }
    }
}

/// A transcoding recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionProfile {
    /// Output container/extension, e.g. `mp4`.
    pub target_format: String,

    /// Encoder name, e.g. `libx264`.
    pub codec: String,

    /// Additional `-key value` encoder options.
    pub extra_args: BTreeMap<String, String>,
}

impl ConversionProfile {
    fn new(target_format: &str, codec: &str) -> Self {
        Self {
            target_format: target_format.to_string(),
            codec: codec.to_string(),
            extra_args: BTreeMap::new(),
        }
    }

    fn with_arg(mut self, key: &str, value: &str) -> Self {
        self.extra_args.insert(key.to_string(), value.to_string());
        self
    }

    /// Whether the profile produces an audio-only file.
    pub fn is_audio(&self) -> bool {
        self.target_format == "mp3"
    }
}

/// Named conversion presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionPreset {
    /// Keep the downloaded file as-is (default).
    #[default]
    None,
    /// Re-encode to H.264 MP4.
    Mp4,
    /// Re-encode to H.264 MP4 at CRF 28.
    Compress,
    /// Extract the audio track as MP3.
    Mp3,
}

impl ConversionPreset {
    /// The profile for this preset, or `None` when no conversion is wanted.
    pub fn profile(&self) -> Option<ConversionProfile> {
        match self {
            ConversionPreset::None => None,
            ConversionPreset::Mp4 => Some(ConversionProfile::new("mp4", "libx264")),
            ConversionPreset::Compress => {
                Some(ConversionProfile::new("mp4", "libx264").with_arg("crf", "28"))
            }
            ConversionPreset::Mp3 => Some(ConversionProfile::new("mp3", "libmp3lame")),
        }
    }
}

impl fmt::Display for ConversionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionPreset::None => write!(f, "none"),
            ConversionPreset::Mp4 => write!(f, "mp4"),
            ConversionPreset::Compress => write!(f, "compress"),
            ConversionPreset::Mp3 => write!(f, "mp3"),
        }
    }
}

impl FromStr for ConversionPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ConversionPreset::None),
            "mp4" => Ok(ConversionPreset::Mp4),
            "compress" => Ok(ConversionPreset::Compress),
            "mp3" => Ok(ConversionPreset::Mp3),
            _ => Err(format!("Unknown conversion preset: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_round_trips_through_display() {
        for preset in [
            QualityPreset::Best,
            QualityPreset::BestMp4,
            QualityPreset::Mp4720,
            QualityPreset::Mp4480,
            QualityPreset::Audio,
        ] {
            assert_eq!(preset.to_string().parse::<QualityPreset>(), Ok(preset));
        }
        assert!("4k".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_quality_selectors() {
        assert_eq!(QualityPreset::default().format_selector(), "best[ext=mp4]/best");
        assert_eq!(QualityPreset::Audio.format_selector(), "bestaudio");
    }

    #[test]
    fn test_conversion_profiles() {
        assert_eq!(ConversionPreset::None.profile(), None);

        let compress = ConversionPreset::Compress.profile().unwrap();
        assert_eq!(compress.target_format, "mp4");
        assert_eq!(compress.codec, "libx264");
        assert_eq!(compress.extra_args.get("crf").map(String::as_str), Some("28"));

        let mp3 = ConversionPreset::Mp3.profile().unwrap();
        assert!(mp3.is_audio());
        assert!(mp3.extra_args.is_empty());
    }

    #[test]
    fn test_presets_deserialize_from_toml_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            quality: QualityPreset,
            conversion: ConversionPreset,
        }

        let parsed: Wrapper = toml::from_str("quality = \"720p\"\nconversion = \"compress\"").unwrap();
        assert_eq!(parsed.quality, QualityPreset::Mp4720);
        assert_eq!(parsed.conversion, ConversionPreset::Compress);

        let parsed: Wrapper = toml::from_str("quality = \"best-mp4\"\nconversion = \"none\"").unwrap();
        assert_eq!(parsed.quality, QualityPreset::BestMp4);
        assert_eq!(parsed.conversion, ConversionPreset::None);
    }
}
