//! Subprocess execution with a time bound.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Captured output of a successful tool run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Why a tool run did not succeed.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{} not found. Please install it and ensure it's in your PATH.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Exited with {}: {}", describe_exit(.exit_code), excerpt(.stderr, 200))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Shorten tool diagnostics for log lines.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

/// Run `program` with `args`, waiting at most `timeout` when given.
///
/// The child is killed if the time bound expires. A non-zero exit is an
/// error carrying the captured stderr.
pub async fn run_tool(
    program: &Path,
    args: &[OsString],
    timeout: Option<Duration>,
) -> Result<ToolOutput, ToolError> {
    tracing::debug!("Running {} {:?}", program.display(), args);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = command.output();
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, output)
            .await
            .map_err(|_| ToolError::Timeout(limit))?,
        None => output.await,
    }
    .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound(program.to_path_buf())
        } else {
            ToolError::Spawn {
                program: program.to_path_buf(),
                source: e,
            }
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ToolError::Failed {
            exit_code: output.status.code(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}
