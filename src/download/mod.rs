//! Download module for creator polling.
//!
//! This module provides:
//! - Per-cycle download settings
//! - Single item fetching and post-download conversion
//! - The list-filter-download-persist cycle
//! - Periodic monitoring and the worker that owns the cycle runner
//! - Progress events for frontends

pub mod convert;
pub mod cycle;
pub mod events;
pub mod scheduler;
pub mod single;
pub mod spec;
pub mod state;
pub mod worker;

#[cfg(test)]
pub(crate) mod fakes;

pub use convert::convert;
pub use cycle::{CycleRunner, ITEM_DELAY};
pub use events::{EventReceiver, EventSink, LogLevel, ProgressEvent, PROGRESS_TARGET};
pub use scheduler::{Scheduler, ERROR_COOLDOWN, TICK};
pub use single::fetch_one;
pub use spec::DownloadSpec;
pub use state::{CyclePhase, CycleSummary, MonitorStats};
pub use worker::Worker;
