//! Post-download conversion.

use std::path::{Path, PathBuf};

use crate::config::ConversionProfile;
use crate::error::ConversionError;
use crate::tools::Transcoder;

/// Convert `input` according to `profile` and return the converted path.
///
/// The original is removed only after the transcoder succeeded and its
/// output exists. On any failure the original stays where it was and
/// partial output is discarded.
pub async fn convert(
    transcoder: &dyn Transcoder,
    input: &Path,
    profile: &ConversionProfile,
) -> Result<PathBuf, ConversionError> {
    // Extensions differing only in case may name the same file
    let in_place = input
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&profile.target_format));

    // The transcoder cannot read and write the same file
    let (target, output) = if in_place {
        (
            input.with_extension(format!("converting.{}", profile.target_format)),
            input.to_path_buf(),
        )
    } else {
        let output = input.with_extension(&profile.target_format);
        (output.clone(), output)
    };

    if let Err(e) = transcoder.transcode(input, &target, profile).await {
        discard(&target);
        return Err(e);
    }

    if !target.exists() {
        return Err(ConversionError::MissingOutput(target));
    }

    if in_place {
        if let Err(e) = std::fs::rename(&target, input) {
            discard(&target);
            return Err(e.into());
        }
    } else {
        std::fs::remove_file(input)?;
    }

    Ok(output)
}

fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::debug!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionPreset;
    use crate::download::fakes::FakeTranscoder;
    use std::fs;

    #[tokio::test]
    async fn test_success_replaces_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.webm");
        fs::write(&input, "raw").unwrap();

        let profile = ConversionPreset::Mp4.profile().unwrap();
        let output = convert(&FakeTranscoder::succeeding(), &input, &profile)
            .await
            .unwrap();

        assert_eq!(output, dir.path().join("clip.mp4"));
        assert!(output.exists());
        assert!(!input.exists());
    }

    #[tokio::test]
    async fn test_same_extension_converts_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        fs::write(&input, "raw").unwrap();

        let profile = ConversionPreset::Compress.profile().unwrap();
        let transcoder = FakeTranscoder::succeeding();
        let output = convert(&transcoder, &input, &profile).await.unwrap();

        assert_eq!(output, input);
        assert_eq!(fs::read_to_string(&output).unwrap(), "converted");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let calls = transcoder.calls();
        assert_eq!(calls[0].1, dir.path().join("clip.converting.mp4"));
    }

    #[tokio::test]
    async fn test_uppercase_extension_converts_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.MP4");
        fs::write(&input, "raw").unwrap();

        let profile = ConversionPreset::Compress.profile().unwrap();
        let transcoder = FakeTranscoder::succeeding();
        let output = convert(&transcoder, &input, &profile).await.unwrap();

        assert_eq!(output, input);
        assert_eq!(fs::read_to_string(&input).unwrap(), "converted");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let calls = transcoder.calls();
        assert_eq!(calls[0].0, input);
        assert_eq!(calls[0].1, dir.path().join("clip.converting.mp4"));
    }

    #[tokio::test]
    async fn test_failure_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.webm");
        fs::write(&input, "raw").unwrap();

        let profile = ConversionPreset::Mp3.profile().unwrap();
        let err = convert(&FakeTranscoder::failing(), &input, &profile)
            .await
            .unwrap_err();

        assert!(matches!(err, ConversionError::ToolFailure(_)));
        assert_eq!(fs::read_to_string(&input).unwrap(), "raw");
        assert!(!dir.path().join("clip.mp3").exists());
    }

    #[tokio::test]
    async fn test_missing_output_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mkv");
        fs::write(&input, "raw").unwrap();

        let profile = ConversionPreset::Mp4.profile().unwrap();
        let err = convert(&FakeTranscoder::silent(), &input, &profile)
            .await
            .unwrap_err();

        assert!(matches!(err, ConversionError::MissingOutput(_)));
        assert!(input.exists());
    }
}
