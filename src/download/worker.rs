//! The single worker that owns the cycle runner.
//!
//! A one-shot download and a monitoring session both need the runner, so at
//! most one of them is active. While monitoring, the runner lives inside the
//! scheduler task and comes back when that task ends.

use std::mem;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::download::cycle::CycleRunner;
use crate::download::events::EventSink;
use crate::download::scheduler::Scheduler;
use crate::download::spec::DownloadSpec;
use crate::download::state::{CycleSummary, MonitorStats};
use crate::error::{Error, Result};

enum Slot {
    Idle(CycleRunner),
    Monitoring {
        cancel: CancellationToken,
        handle: JoinHandle<(CycleRunner, MonitorStats)>,
    },
    /// The monitoring task panicked and took the runner with it.
    Lost,
}

pub struct Worker {
    slot: Slot,
    specs: watch::Sender<DownloadSpec>,
    events: EventSink,
}

impl Worker {
    pub fn new(runner: CycleRunner, spec: DownloadSpec) -> Self {
        let events = runner.events().clone();
        let (specs, _) = watch::channel(spec);
        Self {
            slot: Slot::Idle(runner),
            specs,
            events,
        }
    }

    /// Settings the next cycle will start with.
    pub fn spec(&self) -> DownloadSpec {
        self.specs.borrow().clone()
    }

    /// Replace the settings. A running monitor picks them up next cycle.
    pub fn update_spec(&self, spec: DownloadSpec) {
        self.specs.send_replace(spec);
    }

    /// Sender half for pushing settings from outside, e.g. a config watcher.
    pub fn spec_sender(&self) -> watch::Sender<DownloadSpec> {
        self.specs.clone()
    }

    /// Whether a monitoring session is running and has not been asked to stop.
    pub fn is_monitoring(&self) -> bool {
        matches!(
            &self.slot,
            Slot::Monitoring { cancel, handle } if !cancel.is_cancelled() && !handle.is_finished()
        )
    }

    /// Run a single cycle now with the current settings.
    ///
    /// Rejected while monitoring is active. If monitoring was stopped but its
    /// last cycle is still finishing, this waits for it first.
    pub async fn download_now(&mut self) -> Result<CycleSummary> {
        let spec = self.spec();
        let runner = self.idle_runner().await?;
        runner.run_cycle(&spec).await
    }

    /// Start monitoring `account` every `interval_minutes`.
    pub fn start_monitoring(&mut self, account: &str, interval_minutes: u32) -> Result<()> {
        let runner = match mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Idle(runner) => runner,
            Slot::Monitoring { cancel, handle } => {
                let reason = if cancel.is_cancelled() {
                    "monitoring is still stopping"
                } else {
                    "monitoring is already running"
                };
                self.slot = Slot::Monitoring { cancel, handle };
                return Err(Error::WorkerBusy(reason));
            }
            Slot::Lost => return Err(lost()),
        };

        let cancel = CancellationToken::new();
        let scheduler = Scheduler::new(
            account,
            interval_minutes,
            self.specs.subscribe(),
            cancel.clone(),
            self.events.clone(),
        );
        let handle = tokio::spawn(scheduler.run(runner));

        self.slot = Slot::Monitoring { cancel, handle };
        Ok(())
    }

    /// Ask monitoring to stop. Calling it again, or when idle, does nothing.
    pub fn stop_monitoring(&self) {
        if let Slot::Monitoring { cancel, .. } = &self.slot {
            if !cancel.is_cancelled() {
                self.events.info("Stopping monitoring...");
                cancel.cancel();
            }
        }
    }

    /// Wait for a stopped monitoring session to hand the runner back.
    ///
    /// Returns the session's statistics, or `None` if nothing was running.
    /// Does not request the stop itself.
    pub async fn join_monitor(&mut self) -> Result<Option<MonitorStats>> {
        match mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Idle(runner) => {
                self.slot = Slot::Idle(runner);
                Ok(None)
            }
            Slot::Monitoring { handle, .. } => match handle.await {
                Ok((runner, stats)) => {
                    self.slot = Slot::Idle(runner);
                    Ok(Some(stats))
                }
                Err(e) => Err(Error::WorkerFailed(e.to_string())),
            },
            Slot::Lost => Err(lost()),
        }
    }

    /// Clear the download history. Requires explicit confirmation.
    pub async fn reset(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(Error::ResetNotConfirmed);
        }

        let destination = self.spec().destination;
        let runner = self.idle_runner().await?;
        runner.reset_seen(&destination);
        Ok(())
    }

    /// Size of the seen-set, unless the runner is out with a monitor.
    pub fn seen_count(&self) -> Option<usize> {
        match &self.slot {
            Slot::Idle(runner) => Some(runner.seen().len()),
            _ => None,
        }
    }

    /// Stop monitoring and wait for it. If a session was running, its
    /// seen-set is saved once more on the way out.
    pub async fn shutdown(mut self) -> Result<Option<MonitorStats>> {
        self.stop_monitoring();
        let stats = self.join_monitor().await?;

        if stats.is_some() {
            let destination = self.spec().destination;
            if let Slot::Idle(runner) = &self.slot {
                runner.save(&destination);
            }
        }

        Ok(stats)
    }

    async fn idle_runner(&mut self) -> Result<&mut CycleRunner> {
        if self.is_monitoring() {
            return Err(Error::WorkerBusy("monitoring is running"));
        }

        self.join_monitor().await?;

        match &mut self.slot {
            Slot::Idle(runner) => Ok(runner),
            _ => Err(lost()),
        }
    }
}

fn lost() -> Error {
    Error::WorkerFailed("cycle runner unavailable".into())
}
