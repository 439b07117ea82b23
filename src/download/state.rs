//! Cycle phase and statistics tracking.

use std::fmt;

/// Where a cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Listing,
    Filtering,
    /// Downloading item `index` (1-based) of `total`.
    Downloading { index: usize, total: usize },
    Persisting,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePhase::Idle => write!(f, "idle"),
            CyclePhase::Listing => write!(f, "listing"),
            CyclePhase::Filtering => write!(f, "filtering"),
            CyclePhase::Downloading { index, total } => {
                write!(f, "downloading {}/{}", index, total)
            }
            CyclePhase::Persisting => write!(f, "persisting"),
        }
    }
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSummary {
    /// New items a download was attempted for.
    pub attempted: usize,
    /// Items downloaded (conversion outcome irrelevant).
    pub succeeded: usize,
    /// Listed items already in the seen-set.
    pub skipped: usize,
    /// Downloaded items whose conversion failed.
    pub conversion_failures: usize,
}

impl CycleSummary {
    /// Items whose download failed.
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Totals across one monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub downloaded: u64,
    pub download_failures: u64,
    pub conversion_failures: u64,
}

impl MonitorStats {
    /// Add a finished cycle's numbers.
    pub fn add_cycle(&mut self, summary: &CycleSummary) {
        self.cycles_completed += 1;
        self.downloaded += summary.succeeded as u64;
        self.download_failures += summary.failed() as u64;
        self.conversion_failures += summary.conversion_failures as u64;
    }

    /// Record a cycle that aborted.
    pub fn mark_cycle_failed(&mut self) {
        self.cycles_failed += 1;
    }
}
