//! Duration parsing utilities.

use crate::constants::time;
use std::time::Duration;

/// Parses a duration string like "30s", "5m", "1h" into a Duration.
///
/// A bare number ("300") is taken as seconds.
///
/// # Arguments
/// * `s` - Duration string (e.g., "30s", "5m", "1h", "300")
///
/// # Returns
/// * `Ok(Duration)` on success
/// * `Err(&str)` with error message on failure
pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
    let s = s.trim();
    let unit = s.chars().last().ok_or("Empty duration")?;

    if unit.is_ascii_digit() {
        let value: u64 = s.parse().map_err(|_| "Invalid number in duration")?;
        return Ok(Duration::from_secs(value));
    }

    let value: u64 = s[..s.len() - 1]
        .parse()
        .map_err(|_| "Invalid number in duration")?;

    match unit {
        's' => Ok(Duration::from_secs(value)),
        'm' => Ok(Duration::from_secs(value * time::SECONDS_PER_MINUTE)),
        'h' => Ok(Duration::from_secs(value * time::SECONDS_PER_HOUR)),
        _ => Err("Invalid duration unit"),
    }
}
