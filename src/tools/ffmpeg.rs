//! `ffmpeg` adapter for post-download conversion.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ConversionProfile;
use crate::error::ConversionError;
use crate::tools::process::{excerpt, run_tool, ToolError};
use crate::tools::Transcoder;

/// Arguments for converting `input` into `output`.
pub fn transcode_args(input: &Path, output: &Path, profile: &ConversionProfile) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.as_os_str().to_owned(), "-y".into()];

    if !profile.codec.is_empty() {
        if profile.is_audio() {
            args.push("-acodec".into());
            args.push(profile.codec.clone().into());
        } else {
            args.push("-vcodec".into());
            args.push(profile.codec.clone().into());
            for (key, value) in &profile.extra_args {
                args.push(format!("-{}", key).into());
                args.push(value.clone().into());
            }
        }
    }

    args.push(output.as_os_str().to_owned());
    args
}

/// The `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Report the first line of `ffmpeg -version`.
    pub async fn version(&self) -> Result<String, ToolError> {
        let output = run_tool(
            &self.program,
            &["-version".into()],
            Some(Duration::from_secs(30)),
        )
        .await?;
        Ok(output.stdout.lines().next().unwrap_or_default().to_string())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &ConversionProfile,
    ) -> Result<(), ConversionError> {
        let args = transcode_args(input, output, profile);

        run_tool(&self.program, &args, None)
            .await
            .map_err(|e| match e {
                ToolError::Failed { stderr, .. } => ConversionError::ToolFailure(excerpt(&stderr, 100)),
                other => ConversionError::ToolFailure(other.to_string()),
            })?;

        Ok(())
    }
}
