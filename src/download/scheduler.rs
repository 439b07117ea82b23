//! Periodic monitoring loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::download::cycle::CycleRunner;
use crate::download::events::EventSink;
use crate::download::spec::DownloadSpec;
use crate::download::state::MonitorStats;

/// Granularity of waits; a stop request is noticed within one tick.
pub const TICK: Duration = Duration::from_secs(1);

/// Wait after a cycle that failed before trying again.
pub const ERROR_COOLDOWN: Duration = Duration::from_secs(60);

/// Runs cycles for one account until cancelled.
///
/// The account is fixed when monitoring starts. Every other setting is read
/// from the latest [`DownloadSpec`] at the start of each cycle.
pub struct Scheduler {
    account: String,
    interval: Duration,
    cooldown: Duration,
    specs: watch::Receiver<DownloadSpec>,
    cancel: CancellationToken,
    events: EventSink,
}

impl Scheduler {
    pub fn new(
        account: impl Into<String>,
        interval_minutes: u32,
        specs: watch::Receiver<DownloadSpec>,
        cancel: CancellationToken,
        events: EventSink,
    ) -> Self {
        Self {
            account: account.into(),
            interval: Duration::from_secs(u64::from(interval_minutes) * 60),
            cooldown: ERROR_COOLDOWN,
            specs,
            cancel,
            events,
        }
    }

    /// Run until the token is cancelled and hand the runner back.
    ///
    /// Cancellation never interrupts a cycle that has started; it takes
    /// effect at the next wait.
    pub async fn run(self, mut runner: CycleRunner) -> (CycleRunner, MonitorStats) {
        let mut stats = MonitorStats::default();

        self.events.info(format!(
            "Started monitoring @{} (checking every {} minutes)",
            self.account,
            self.interval.as_secs() / 60
        ));
        self.events.status("Monitoring started");

        while !self.cancel.is_cancelled() {
            let spec = self.specs.borrow().clone().for_account(&self.account);

            let pause = match runner.run_cycle(&spec).await {
                Ok(summary) => {
                    stats.add_cycle(&summary);
                    self.interval
                }
                Err(e) => {
                    stats.mark_cycle_failed();
                    self.events.error(format!("Monitoring error: {}", e));
                    self.cooldown
                }
            };

            if !self.wait(pause).await {
                break;
            }
        }

        self.events.info("Monitoring stopped");
        self.events.status("Monitoring stopped");
        (runner, stats)
    }

    /// Sleep in ticks. Returns `false` if cancelled while waiting.
    async fn wait(&self, total: Duration) -> bool {
        let mut remaining = total;

        while !remaining.is_zero() {
            let step = remaining.min(TICK);
            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = sleep(step) => {}
            }
            remaining -= step;
        }

        !self.cancel.is_cancelled()
    }
}
