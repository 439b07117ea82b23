//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - A spinner that renders progress events
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    format_event_line, print_banner, print_config_summary, print_error, print_info,
    print_success, print_tool_check, print_warning,
};
pub use progress::{create_spinner, render_events};
pub use stats::{print_cycle_summary, print_monitor_stats};
