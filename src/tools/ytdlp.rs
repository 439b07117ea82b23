//! `yt-dlp` adapter for listing and fetching.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{DownloadError, ListingError, Result};
use crate::media::{parse_listing, RemoteItem};
use crate::tools::process::{excerpt, run_tool, ToolError};
use crate::tools::{FetchRequest, Fetcher, RemoteLister};

/// Platform base URL.
const PLATFORM_BASE: &str = "https://www.tiktok.com/";

/// Time bound for enumerating a creator's items.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(60);

/// Time bound for fetching one item.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the profile URL for an account.
pub fn account_url(account: &str) -> Result<Url> {
    Ok(Url::parse(PLATFORM_BASE)?.join(&format!("@{}", account))?)
}

/// Build the URL of one video.
pub fn video_url(account: &str, id: &str) -> Result<Url> {
    Ok(Url::parse(PLATFORM_BASE)?.join(&format!("@{}/video/{}", account, id))?)
}

/// Arguments for a flat `id title` listing.
pub fn list_args(url: &Url, limit: u32, verify_certificates: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--flat-playlist".into(),
        "--print".into(),
        "%(id)s %(title)s".into(),
        "--playlist-end".into(),
        limit.to_string().into(),
    ];

    if !verify_certificates {
        args.push("--no-check-certificate".into());
    }

    args.push(url.as_str().into());
    args
}

/// Arguments for fetching one video.
pub fn fetch_args(url: &Url, request: &FetchRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--format".into(),
        request.format_selector.clone().into(),
        "--output".into(),
        request.output_template.clone().into_os_string(),
        "--no-warnings".into(),
    ];

    if !request.verify_certificates {
        args.push("--no-check-certificate".into());
    }

    if request.write_metadata {
        args.push("--write-info-json".into());
    }

    if request.write_thumbnail {
        args.push("--write-thumbnail".into());
    }

    args.push(url.as_str().into());
    args
}

/// The `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    list_timeout: Duration,
    fetch_timeout: Duration,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            list_timeout: LIST_TIMEOUT,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the listing and per-item fetch bounds.
    pub fn with_timeouts(mut self, list: Duration, fetch: Duration) -> Self {
        self.list_timeout = list;
        self.fetch_timeout = fetch;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Report the installed version.
    pub async fn version(&self) -> std::result::Result<String, ToolError> {
        let output = run_tool(&self.program, &["--version".into()], Some(self.list_timeout)).await?;
        Ok(output.stdout.trim().to_string())
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl RemoteLister for YtDlp {
    async fn list(
        &self,
        account: &str,
        limit: u32,
        verify_certificates: bool,
    ) -> std::result::Result<Vec<RemoteItem>, ListingError> {
        let url = account_url(account).map_err(|e| ListingError::ToolFailure(e.to_string()))?;
        let args = list_args(&url, limit, verify_certificates);

        let output = run_tool(&self.program, &args, Some(self.list_timeout))
            .await
            .map_err(|e| match e {
                ToolError::Timeout(limit) => ListingError::Timeout(limit),
                ToolError::Failed { stderr, .. } => ListingError::ToolFailure(excerpt(&stderr, 300)),
                other => ListingError::ToolFailure(other.to_string()),
            })?;

        Ok(parse_listing(&output.stdout, limit as usize))
    }
}

#[async_trait]
impl Fetcher for YtDlp {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<(), DownloadError> {
        let url = video_url(&request.account, &request.item_id)
            .map_err(|e| DownloadError::tool_failure(e.to_string()))?;
        let args = fetch_args(&url, request);

        run_tool(&self.program, &args, Some(self.fetch_timeout))
            .await
            .map_err(|e| match e {
                ToolError::Timeout(limit) => {
                    DownloadError::timeout(format!("no result after {}s", limit.as_secs()))
                }
                ToolError::Failed { stderr, .. } => DownloadError::tool_failure(excerpt(&stderr, 100)),
                other => DownloadError::tool_failure(other.to_string()),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadFailure;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn request() -> FetchRequest {
        FetchRequest {
            account: "creator".into(),
            item_id: "7301".into(),
            format_selector: "best[ext=mp4]/best".into(),
            output_template: PathBuf::from("/dl/creator/creator_7301_Title.%(ext)s"),
            verify_certificates: true,
            write_metadata: false,
            write_thumbnail: false,
        }
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            account_url("creator").unwrap().as_str(),
            "https://www.tiktok.com/@creator"
        );
        assert_eq!(
            video_url("creator", "7301").unwrap().as_str(),
            "https://www.tiktok.com/@creator/video/7301"
        );
    }

    #[test]
    fn test_list_args() {
        let url = account_url("creator").unwrap();
        assert_eq!(
            strings(&list_args(&url, 25, true)),
            vec![
                "--flat-playlist",
                "--print",
                "%(id)s %(title)s",
                "--playlist-end",
                "25",
                "https://www.tiktok.com/@creator",
            ]
        );

        let args = strings(&list_args(&url, 25, false));
        assert!(args.contains(&"--no-check-certificate".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.tiktok.com/@creator");
    }

    #[test]
    fn test_fetch_args_minimal() {
        let req = request();
        let url = video_url(&req.account, &req.item_id).unwrap();
        assert_eq!(
            strings(&fetch_args(&url, &req)),
            vec![
                "--format",
                "best[ext=mp4]/best",
                "--output",
                "/dl/creator/creator_7301_Title.%(ext)s",
                "--no-warnings",
                "https://www.tiktok.com/@creator/video/7301",
            ]
        );
    }

    #[test]
    fn test_fetch_args_optional_flags() {
        let mut req = request();
        req.verify_certificates = false;
        req.write_metadata = true;
        req.write_thumbnail = true;

        let url = video_url(&req.account, &req.item_id).unwrap();
        let args = strings(&fetch_args(&url, &req));
        assert!(args.contains(&"--no-check-certificate".to_string()));
        assert!(args.contains(&"--write-info-json".to_string()));
        assert!(args.contains(&"--write-thumbnail".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.tiktok.com/@creator/video/7301");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_reports_tool_failure() {
        let lister = YtDlp::new("false");
        let err = lister.list("creator", 5, true).await.unwrap_err();
        assert!(matches!(err, ListingError::ToolFailure(_)));
    }

    /// A stand-in executable that ignores its arguments and hangs.
    #[cfg(unix)]
    fn hanging_tool(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("yt-dlp");
        std::fs::write(&path, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_reports_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let lister = YtDlp::new(hanging_tool(dir.path()))
            .with_timeouts(Duration::from_millis(100), Duration::from_millis(100));

        let err = lister.list("creator", 5, true).await.unwrap_err();
        assert!(matches!(err, ListingError::Timeout(limit) if limit == Duration::from_millis(100)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_reports_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlp::new(hanging_tool(dir.path()))
            .with_timeouts(Duration::from_secs(60), Duration::from_millis(100));

        let err = fetcher.fetch(&request()).await.unwrap_err();
        assert_eq!(err.reason, DownloadFailure::Timeout);
    }

    #[test]
    fn test_default_timeouts() {
        let tool = YtDlp::default();
        assert_eq!(tool.list_timeout, LIST_TIMEOUT);
        assert_eq!(tool.fetch_timeout, FETCH_TIMEOUT);
    }
}
