//! Console output utilities.

use chrono::{DateTime, Local};
use console::style;

use crate::download::{DownloadSpec, LogLevel};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Render a progress log line as `[HH:MM:SS] LEVEL message`.
pub fn format_event_line(at: &DateTime<Local>, level: LogLevel, message: &str) -> String {
    let tag = match level {
        LogLevel::Info => style("INFO").cyan().bold(),
        LogLevel::Success => style("OK").green().bold(),
        LogLevel::Warning => style("WARN").yellow().bold(),
        LogLevel::Error => style("ERROR").red().bold(),
    };
    format!("[{}] {} {}", at.format("%H:%M:%S"), tag, message)
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     tikstalk                                          ║
║     Keep a local copy of a TikTok creator's videos    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the settings a run will use.
pub fn print_config_summary(spec: &DownloadSpec, quality: &str, conversion: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Creator:    @{}", spec.account);
    println!("  Directory:  {}", spec.destination.display());
    println!("  Limit:      {} videos", spec.limit);
    println!("  Quality:    {}", quality);
    println!("  Conversion: {}", conversion);
    if !spec.verify_certificates {
        println!("  {}", style("TLS certificate checks disabled").yellow());
    }
    println!();
}

/// Print one line of the tool check.
pub fn print_tool_check(name: &str, result: &Result<String, String>) {
    match result {
        Ok(version) => println!("  {} {} {}", style("✓").green().bold(), name, style(version).dim()),
        Err(e) => println!("  {} {} {}", style("✗").red().bold(), name, e),
    }
}
