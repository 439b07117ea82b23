//! Statistics reporting.

use console::style;

use crate::download::{CycleSummary, MonitorStats};

/// Print the outcome of a one-shot cycle.
pub fn print_cycle_summary(summary: &CycleSummary, seen_total: usize) {
    println!();
    println!("{}", style("Cycle summary:").bold());
    println!("  New:        {}", summary.attempted);
    println!("  Downloaded: {}", style(summary.succeeded).green());
    if summary.failed() > 0 {
        println!("  Failed:     {}", style(summary.failed()).red());
    }
    if summary.conversion_failures > 0 {
        println!(
            "  Conversion failed: {} (originals kept)",
            style(summary.conversion_failures).yellow()
        );
    }
    println!("  Skipped:    {} (already downloaded)", summary.skipped);
    println!("  History:    {} videos", seen_total);
}

/// Print totals for a monitoring session.
pub fn print_monitor_stats(stats: &MonitorStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Monitoring Statistics:").bold());
    println!("  Cycles completed: {}", stats.cycles_completed);
    if stats.cycles_failed > 0 {
        println!("  Cycles failed:    {}", style(stats.cycles_failed).red());
    }
    println!("  Downloaded:       {}", style(stats.downloaded).green());
    if stats.download_failures > 0 {
        println!("  Failed:           {}", style(stats.download_failures).red());
    }
    if stats.conversion_failures > 0 {
        println!(
            "  Conversion failed: {}",
            style(stats.conversion_failures).yellow()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}
