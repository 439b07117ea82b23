//! One list-filter-download-persist pass over a creator.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;

use crate::dedup::{DedupKey, SeenSet, SeenSetStore};
use crate::download::convert::convert;
use crate::download::events::EventSink;
use crate::download::single::fetch_one;
use crate::download::spec::DownloadSpec;
use crate::download::state::{CyclePhase, CycleSummary};
use crate::error::{DownloadError, Result};
use crate::fs::{ensure_dir, is_convertible};
use crate::media::RemoteItem;
use crate::tools::Toolset;

/// Pause between consecutive item downloads.
pub const ITEM_DELAY: Duration = Duration::from_secs(1);

const STATUS_TITLE_CHARS: usize = 30;
const LOG_TITLE_CHARS: usize = 40;

/// Owns the seen-set and runs cycles against it.
///
/// Only one cycle can run at a time: `run_cycle` takes `&mut self`.
pub struct CycleRunner {
    tools: Toolset,
    store: SeenSetStore,
    seen: SeenSet,
    events: EventSink,
    item_delay: Duration,
    phase: CyclePhase,
}

/// What happened to a downloaded item after the fetch.
struct ItemOutcome {
    conversion_failed: bool,
}

impl CycleRunner {
    pub fn new(tools: Toolset, store: SeenSetStore, seen: SeenSet, events: EventSink) -> Self {
        Self {
            tools,
            store,
            seen,
            events,
            item_delay: ITEM_DELAY,
            phase: CyclePhase::Idle,
        }
    }

    /// Override the pause between items.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    /// Run one cycle.
    ///
    /// A listing failure aborts before anything is downloaded or saved.
    /// Item failures are logged and skipped. The seen-set is saved once at
    /// the end of every cycle whose listing succeeded.
    pub async fn run_cycle(&mut self, spec: &DownloadSpec) -> Result<CycleSummary> {
        let result = self.run_phases(spec).await;
        self.phase = CyclePhase::Idle;
        result
    }

    async fn run_phases(&mut self, spec: &DownloadSpec) -> Result<CycleSummary> {
        ensure_dir(&spec.account_folder()?)?;

        self.set_phase(CyclePhase::Listing);
        self.events.status("Getting video list...");
        self.events
            .info(format!("Getting videos for @{}...", spec.account));

        let listing = match self
            .tools
            .lister
            .list(&spec.account, spec.limit, spec.verify_certificates)
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                self.events.error(format!("✗ {}", e));
                self.events.status("Failed to get video list");
                return Err(e.into());
            }
        };

        self.set_phase(CyclePhase::Filtering);
        let (pending, skipped) = self.filter_new(listing);
        let total = pending.len();
        let mut summary = CycleSummary {
            attempted: total,
            skipped,
            ..Default::default()
        };

        if pending.is_empty() {
            self.events.info("No new videos to download");
            self.events.status("No new videos found");
        } else {
            self.events
                .info(format!("Found {} new videos to download", total));

            for (i, (item, key)) in pending.into_iter().enumerate() {
                self.set_phase(CyclePhase::Downloading {
                    index: i + 1,
                    total,
                });
                self.events.status(format!(
                    "Downloading {}/{}: {}...",
                    i + 1,
                    total,
                    item.short_title(STATUS_TITLE_CHARS)
                ));

                match self.download_item(&item, spec).await {
                    Ok(outcome) => {
                        self.seen.insert(key);
                        summary.succeeded += 1;
                        if outcome.conversion_failed {
                            summary.conversion_failures += 1;
                        }
                        self.events.count(self.seen.len());
                    }
                    Err(e) => {
                        self.events.warn(format!(
                            "✗ Failed: {} - {}",
                            item.short_title(LOG_TITLE_CHARS),
                            e
                        ));
                    }
                }

                if i + 1 < total {
                    sleep(self.item_delay).await;
                }
            }

            self.events.info(format!(
                "Download complete: {}/{} videos downloaded",
                summary.succeeded, total
            ));
            self.events
                .status(format!("Complete: {}/{} downloaded", summary.succeeded, total));
        }

        self.set_phase(CyclePhase::Persisting);
        self.save(&spec.destination);

        Ok(summary)
    }

    /// Keep listed items whose key is neither seen nor repeated in the listing.
    fn filter_new(&self, listing: Vec<RemoteItem>) -> (Vec<(RemoteItem, DedupKey)>, usize) {
        let mut queued = HashSet::new();
        let mut pending = Vec::new();
        let mut skipped = 0;

        for item in listing {
            let key = item.dedup_key();
            if self.seen.contains(&key) {
                skipped += 1;
            } else if queued.insert(key.clone()) {
                pending.push((item, key));
            } else {
                tracing::debug!("Duplicate listing entry {}", item.id);
            }
        }

        (pending, skipped)
    }

    async fn download_item(
        &self,
        item: &RemoteItem,
        spec: &DownloadSpec,
    ) -> std::result::Result<ItemOutcome, DownloadError> {
        let path = fetch_one(self.tools.fetcher.as_ref(), item, spec).await?;
        let mut outcome = ItemOutcome {
            conversion_failed: false,
        };

        if let Some(profile) = &spec.conversion {
            if is_convertible(&path) {
                match convert(self.tools.transcoder.as_ref(), &path, profile).await {
                    Ok(converted) => {
                        self.events
                            .success(format!("✓ Converted: {}", file_label(&converted)));
                    }
                    Err(e) => {
                        self.events
                            .warn(format!("✗ {}; keeping {}", e, file_label(&path)));
                        outcome.conversion_failed = true;
                    }
                }
            } else {
                tracing::debug!("Skipping conversion of {}", path.display());
            }
        }

        self.events.success(format!(
            "✓ Downloaded: {}",
            item.short_title(LOG_TITLE_CHARS)
        ));
        Ok(outcome)
    }

    /// Persist the seen-set. A failure is reported but not returned.
    pub fn save(&self, destination: &Path) -> bool {
        match self.store.save(&self.seen, destination) {
            Ok(()) => true,
            Err(e) => {
                self.events.error(format!("Error saving state: {}", e));
                false
            }
        }
    }

    /// Forget every downloaded item and persist the empty set.
    pub fn reset_seen(&mut self, destination: &Path) {
        self.seen = self.store.reset();
        if self.save(destination) {
            self.events.success("Download history reset");
        }
        self.events.count(0);
    }

    fn set_phase(&mut self, phase: CyclePhase) {
        tracing::debug!("Cycle phase: {}", phase);
        self.phase = phase;
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
