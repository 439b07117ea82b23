//! In-memory tool doubles for exercising cycles without yt-dlp or ffmpeg.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::config::{ConversionProfile, QualityPreset};
use crate::download::spec::DownloadSpec;
use crate::error::{ConversionError, DownloadError, ListingError};
use crate::media::RemoteItem;
use crate::tools::{FetchRequest, Fetcher, RemoteLister, Transcoder};

pub fn test_spec(destination: &Path) -> DownloadSpec {
    DownloadSpec {
        account: "creator".into(),
        destination: destination.to_path_buf(),
        limit: 50,
        format_selector: QualityPreset::BestMp4.format_selector().to_string(),
        conversion: None,
        write_metadata: false,
        write_thumbnail: false,
        verify_certificates: true,
    }
}

pub fn items(pairs: &[(&str, &str)]) -> Vec<RemoteItem> {
    pairs
        .iter()
        .map(|(id, title)| RemoteItem::new(*id, *title))
        .collect()
}

/// Lister returning a configurable listing.
#[derive(Default)]
pub struct FakeLister {
    items: Mutex<Vec<RemoteItem>>,
    failing: AtomicBool,
    calls: Mutex<Vec<Instant>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeLister {
    pub fn new(items: Vec<RemoteItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let lister = Self::default();
        lister.set_failing(true);
        lister
    }

    /// Signal `entered` on each call, then wait for `release`.
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn set_items(&self, items: Vec<RemoteItem>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteLister for FakeLister {
    async fn list(
        &self,
        _account: &str,
        limit: u32,
        _verify_certificates: bool,
    ) -> Result<Vec<RemoteItem>, ListingError> {
        self.calls.lock().unwrap().push(Instant::now());

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ListingError::ToolFailure("exit status 1".into()));
        }

        let items = self.items.lock().unwrap();
        Ok(items.iter().take(limit as usize).cloned().collect())
    }
}

/// Fetcher that writes a small file where the real tool would.
pub struct FakeFetcher {
    extension: String,
    failing_ids: HashSet<String>,
    timing_out_ids: HashSet<String>,
    write_files: bool,
    requests: Mutex<Vec<FetchRequest>>,
    fetched: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            failing_ids: HashSet::new(),
            timing_out_ids: HashSet::new(),
            write_files: true,
            requests: Mutex::new(Vec::new()),
            fetched: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    pub fn timing_out_for(mut self, id: &str) -> Self {
        self.timing_out_ids.insert(id.to_string());
        self
    }

    pub fn writing_nothing(mut self) -> Self {
        self.write_files = false;
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.item_id).collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<(), DownloadError> {
        self.requests.lock().unwrap().push(request.clone());
        self.fetched.fetch_add(1, Ordering::SeqCst);

        if self.failing_ids.contains(&request.item_id) {
            return Err(DownloadError::tool_failure("exit status 1"));
        }

        if self.timing_out_ids.contains(&request.item_id) {
            return Err(DownloadError::timeout("no result after 120s"));
        }

        if self.write_files {
            let path = request
                .output_template
                .to_string_lossy()
                .replace("%(ext)s", &self.extension);
            std::fs::write(path, b"media").map_err(|e| DownloadError::tool_failure(e.to_string()))?;
        }

        Ok(())
    }
}

#[derive(Clone, Copy)]
enum TranscodeMode {
    Succeed,
    Fail,
    Silent,
}

/// Transcoder that writes `converted`, fails after a partial write, or
/// reports success without writing anything.
pub struct FakeTranscoder {
    mode: TranscodeMode,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl FakeTranscoder {
    fn with_mode(mode: TranscodeMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_mode(TranscodeMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(TranscodeMode::Fail)
    }

    pub fn silent() -> Self {
        Self::with_mode(TranscodeMode::Silent)
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _profile: &ConversionProfile,
    ) -> Result<(), ConversionError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), output.to_path_buf()));

        match self.mode {
            TranscodeMode::Succeed => {
                std::fs::write(output, b"converted")?;
                Ok(())
            }
            TranscodeMode::Fail => {
                std::fs::write(output, b"partial")?;
                Err(ConversionError::ToolFailure("exit status 1".into()))
            }
            TranscodeMode::Silent => Ok(()),
        }
    }
}
