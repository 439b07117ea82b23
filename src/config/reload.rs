//! Picking up config file edits while monitoring.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::{validate_config, Config};
use crate::download::DownloadSpec;
use crate::error::Result;

/// How often the config file is checked for changes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

type Fingerprint = (SystemTime, u64);

fn fingerprint(path: &Path) -> Option<Fingerprint> {
    let meta = std::fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

/// Build a new spec from the file at `path`.
///
/// `adjust` is applied to the loaded file before validation, e.g. to layer
/// command-line overrides on top. An unset handle falls back to `current`.
pub fn reload_spec<F>(path: &Path, current: &DownloadSpec, adjust: &F) -> Result<DownloadSpec>
where
    F: Fn(&mut Config),
{
    let mut config = Config::load(path)?;
    adjust(&mut config);
    if config.target.username.trim().is_empty() {
        config.target.username = current.account.clone();
    }
    validate_config(&config)?;

    let destination = config.download_directory(Some(&current.destination));
    DownloadSpec::from_config(&config, destination)
}

/// Poll `path` until cancelled and publish a new spec whenever it changes.
///
/// An edit that fails to load or validate is logged and ignored; the last
/// good settings stay in effect.
pub async fn watch_config<F>(
    path: PathBuf,
    specs: watch::Sender<DownloadSpec>,
    cancel: CancellationToken,
    poll: Duration,
    adjust: F,
) where
    F: Fn(&mut Config) + Send + 'static,
{
    let mut last = fingerprint(&path);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(poll) => {}
        }

        let current = fingerprint(&path);
        if current.is_none() || current == last {
            continue;
        }
        last = current;

        let spec = specs.borrow().clone();
        match reload_spec(&path, &spec, &adjust) {
            Ok(updated) if updated != spec => {
                tracing::info!("Reloaded settings from {}", path.display());
                specs.send_replace(updated);
            }
            Ok(_) => tracing::debug!("Config touched without changes"),
            Err(e) => tracing::warn!("Ignoring config change: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::fakes::test_spec;
    use std::fs;

    #[test]
    fn test_reload_spec_keeps_account_when_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikstalk.toml");
        fs::write(&path, "[options]\nvideo_limit = 5\nquality = \"audio\"\n").unwrap();

        let current = test_spec(dir.path());
        let spec = reload_spec(&path, &current, &|_: &mut Config| {}).unwrap();
        assert_eq!(spec.account, "creator");
        assert_eq!(spec.limit, 5);
        assert_eq!(spec.format_selector, "bestaudio");
        assert_eq!(spec.destination, current.destination);
    }

    #[test]
    fn test_reload_spec_applies_adjustments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikstalk.toml");
        fs::write(&path, "[options]\nvideo_limit = 5\n").unwrap();

        let adjust = |config: &mut Config| config.options.video_limit = 9;
        let spec = reload_spec(&path, &test_spec(dir.path()), &adjust).unwrap();
        assert_eq!(spec.limit, 9);
    }

    #[test]
    fn test_reload_spec_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikstalk.toml");
        fs::write(&path, "[options]\nvideo_limit = 0\n").unwrap();

        assert!(reload_spec(&path, &test_spec(dir.path()), &|_: &mut Config| {}).is_err());
    }

    #[tokio::test]
    async fn test_watch_publishes_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikstalk.toml");
        fs::write(&path, "").unwrap();

        let (tx, mut rx) = watch::channel(test_spec(dir.path()));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(watch_config(
            path.clone(),
            tx,
            cancel.clone(),
            Duration::from_millis(20),
            |_: &mut Config| {},
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, "[options]\nvideo_limit = 7\n").unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().limit, 7);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_watch_ignores_broken_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikstalk.toml");
        fs::write(&path, "").unwrap();

        let (tx, rx) = watch::channel(test_spec(dir.path()));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(watch_config(
            path.clone(),
            tx,
            cancel.clone(),
            Duration::from_millis(20),
            |_: &mut Config| {},
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, "this is = = not toml").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(rx.borrow().limit, 50);
        assert!(!rx.has_changed().unwrap());

        cancel.cancel();
        task.await.unwrap();
    }
}
