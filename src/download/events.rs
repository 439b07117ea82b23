//! Progress events sent from the worker to observers.
//!
//! Delivery is fire-and-forget over an unbounded channel: the worker never
//! waits on an observer, and a dropped receiver is ignored. Events from one
//! worker arrive in the order they were sent.

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

/// Tracing target for progress log lines.
///
/// Frontends that render [`ProgressEvent::Log`] themselves can filter this
/// target out of their subscriber.
pub const PROGRESS_TARGET: &str = "tikstalk::progress";

/// Severity of a progress log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Something an observer may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A timestamped log line.
    Log {
        at: DateTime<Local>,
        level: LogLevel,
        message: String,
    },
    /// Short human-readable status.
    Status(String),
    /// Size of the seen-set.
    Count(usize),
}

/// Receiving half handed to observers.
pub type EventReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Sending half used by the worker. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl EventSink {
    /// Create a connected sink and its receiver.
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that only traces.
    pub fn disconnected() -> Self {
        Self::default()
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    fn log(&self, level: LogLevel, message: String) {
        match level {
            LogLevel::Info | LogLevel::Success => {
                tracing::info!(target: PROGRESS_TARGET, "{}", message)
            }
            LogLevel::Warning => tracing::warn!(target: PROGRESS_TARGET, "{}", message),
            LogLevel::Error => tracing::error!(target: PROGRESS_TARGET, "{}", message),
        }

        self.send(ProgressEvent::Log {
            at: Local::now(),
            level,
            message,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message.into());
    }

    pub fn status(&self, status: impl Into<String>) {
        self.send(ProgressEvent::Status(status.into()));
    }

    pub fn count(&self, count: usize) {
        self.send(ProgressEvent::Count(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (sink, mut rx) = EventSink::channel();
        sink.status("Getting video list...");
        sink.info("first");
        sink.count(3);

        assert_eq!(
            rx.try_recv().unwrap(),
            ProgressEvent::Status("Getting video list...".into())
        );
        match rx.try_recv().unwrap() {
            ProgressEvent::Log { level, message, .. } => {
                assert_eq!(level, LogLevel::Info);
                assert_eq!(message, "first");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Count(3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_without_receiver_does_not_panic() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.error("nobody is listening");

        EventSink::disconnected().warn("also fine");
    }
}
