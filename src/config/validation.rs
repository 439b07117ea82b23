//! Configuration validation logic.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Inclusive bounds for the per-cycle video limit.
pub const VIDEO_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=500;

/// Inclusive bounds for the monitoring interval in minutes.
pub const CHECK_INTERVAL_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

/// Handle pattern: letters, digits, underscores and periods, up to 24 chars.
fn handle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.]{1,24}$").expect("valid regex"))
}

fn profile_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://(?:www\.|m\.)?tiktok\.com/@([^/?#]+)").expect("valid regex")
    })
}

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    parse_handle(&config.target.username)?;
    validate_video_limit(config.options.video_limit)?;
    validate_check_interval(config.options.check_interval_minutes)?;

    Ok(())
}

/// Normalise a creator handle from `name`, `@name` or a profile URL.
pub fn parse_handle(input: &str) -> Result<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(Error::MissingConfig("username".to_string()));
    }

    let handle = if input.starts_with("http://") || input.starts_with("https://") {
        profile_url_pattern()
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::ConfigValidation {
                field: "username".to_string(),
                message: format!("Could not extract a handle from URL: {}", input),
            })?
    } else {
        input.trim_start_matches('@')
    };

    if !handle_pattern().is_match(handle) {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!(
                "Handle '{}' is invalid. Use 1-24 letters, digits, underscores or periods.",
                handle
            ),
        });
    }

    if handle == "." || handle.contains("..") {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!("Handle '{}' is invalid.", handle),
        });
    }

    Ok(handle.to_string())
}

/// Validate the per-cycle video limit.
pub fn validate_video_limit(limit: u32) -> Result<()> {
    if !VIDEO_LIMIT_RANGE.contains(&limit) {
        return Err(Error::ConfigValidation {
            field: "video_limit".to_string(),
            message: format!(
                "Must be between {} and {} (got {})",
                VIDEO_LIMIT_RANGE.start(),
                VIDEO_LIMIT_RANGE.end(),
                limit
            ),
        });
    }

    Ok(())
}

/// Validate the monitoring interval.
pub fn validate_check_interval(minutes: u32) -> Result<()> {
    if !CHECK_INTERVAL_RANGE.contains(&minutes) {
        return Err(Error::ConfigValidation {
            field: "check_interval_minutes".to_string(),
            message: format!(
                "Must be between {} and {} minutes (got {})",
                CHECK_INTERVAL_RANGE.start(),
                CHECK_INTERVAL_RANGE.end(),
                minutes
            ),
        });
    }

    Ok(())
}
