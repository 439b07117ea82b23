//! Single item download.

use std::path::PathBuf;

use crate::download::spec::DownloadSpec;
use crate::error::DownloadError;
use crate::fs::{ensure_dir, find_output, output_stem};
use crate::media::RemoteItem;
use crate::tools::{FetchRequest, Fetcher};

/// Fetch one item into its account folder and return the media path.
///
/// The target name is derived only from the account, item id and title, so
/// re-running for the same item writes to the same file.
pub async fn fetch_one(
    fetcher: &dyn Fetcher,
    item: &RemoteItem,
    spec: &DownloadSpec,
) -> Result<PathBuf, DownloadError> {
    let folder = spec
        .account_folder()
        .map_err(|e| DownloadError::tool_failure(e.to_string()))?;
    let stem = output_stem(&spec.account, &item.id, &item.title)
        .map_err(|e| DownloadError::tool_failure(e.to_string()))?;

    ensure_dir(&folder).map_err(|e| DownloadError::tool_failure(e.to_string()))?;

    let request = FetchRequest {
        account: spec.account.clone(),
        item_id: item.id.clone(),
        format_selector: spec.format_selector.clone(),
        output_template: folder.join(format!("{}.%(ext)s", stem)),
        verify_certificates: spec.verify_certificates,
        write_metadata: spec.write_metadata,
        write_thumbnail: spec.write_thumbnail,
    };

    fetcher.fetch(&request).await?;

    match find_output(&folder, &stem) {
        Ok(Some(path)) => {
            tracing::debug!("Fetched {} to {}", item.id, path.display());
            Ok(path)
        }
        Ok(None) => Err(DownloadError::tool_failure(format!(
            "no media file written for {}",
            stem
        ))),
        Err(e) => Err(DownloadError::tool_failure(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::fakes::{test_spec, FakeFetcher};
    use crate::error::DownloadFailure;

    #[tokio::test]
    async fn test_fetch_one_builds_deterministic_target() {
        let dir = tempfile::tempdir().unwrap();
        let spec = test_spec(dir.path());
        let fetcher = FakeFetcher::new("mp4");
        let item = RemoteItem::new("7301", "Crazy!! Trick #1 (MUST SEE)");

        let path = fetch_one(&fetcher, &item, &spec).await.unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("creator")
                .join("creator_7301_Crazy Trick 1 MUST SEE.mp4")
        );

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].output_template,
            dir.path()
                .join("creator")
                .join("creator_7301_Crazy Trick 1 MUST SEE.%(ext)s")
        );
        assert_eq!(requests[0].format_selector, spec.format_selector);

        // Same item, same target
        let again = fetch_one(&fetcher, &item, &spec).await.unwrap();
        assert_eq!(again, path);
    }

    #[tokio::test]
    async fn test_fetch_one_passes_tool_failure_through() {
        let dir = tempfile::tempdir().unwrap();
        let spec = test_spec(dir.path());
        let fetcher = FakeFetcher::new("mp4").failing_for("7301");

        let err = fetch_one(&fetcher, &RemoteItem::new("7301", "x"), &spec)
            .await
            .unwrap_err();
        assert_eq!(err.reason, DownloadFailure::ToolFailure);
    }

    #[tokio::test]
    async fn test_fetch_one_without_output_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let spec = test_spec(dir.path());
        let fetcher = FakeFetcher::new("mp4").writing_nothing();

        let err = fetch_one(&fetcher, &RemoteItem::new("7301", "x"), &spec)
            .await
            .unwrap_err();
        assert_eq!(err.reason, DownloadFailure::ToolFailure);
    }

    #[tokio::test]
    async fn test_fetch_one_rejects_hostile_ids() {
        let dir = tempfile::tempdir().unwrap();
        let spec = test_spec(dir.path());
        let fetcher = FakeFetcher::new("mp4");

        assert!(fetch_one(&fetcher, &RemoteItem::new("../../x", "t"), &spec)
            .await
            .is_err());
        assert!(fetcher.requests().is_empty());
    }
}
