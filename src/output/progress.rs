//! Progress rendering.

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::{EventReceiver, ProgressEvent};
use crate::output::console::format_event_line;

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.dim} {msg}")
            .expect("valid spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Render events onto `spinner` until every sender is gone.
///
/// Log lines print above the spinner, status replaces its message and the
/// seen-set size goes into its prefix.
pub async fn render_events(mut events: EventReceiver, spinner: ProgressBar) {
    while let Some(event) = events.recv().await {
        match event {
            ProgressEvent::Log { at, level, message } => {
                spinner.println(format_event_line(&at, level, &message));
            }
            ProgressEvent::Status(status) => spinner.set_message(status),
            ProgressEvent::Count(count) => spinner.set_prefix(format!("[{} saved]", count)),
        }
    }

    spinner.finish_and_clear();
}
