//! Duration parsing utilities.
//!
//! Command-line durations for the simulation ("5s", "500ms", "2m") are
//! parsed here; YAML durations go through `humantime-serde` instead.

use std::time::Duration;

/// Parse a duration string (e.g., "500ms", "5s", "2m", "1h") into a [`Duration`]
///
/// Supports:
/// - Raw seconds: "5"
/// - Milliseconds: "500ms", "500msec", "500millis"
/// - Seconds: "5s", "5sec", "5secs", "5second", "5seconds"
/// - Minutes: "2m", "2min", "2mins", "2minute", "2minutes"
/// - Hours: "1h", "1hr", "1hrs", "1hour", "1hours"
///
/// # Examples
/// ```
/// use netsim::utils::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("5"), Ok(Duration::from_secs(5)));
/// assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
/// assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
/// assert!(parse_duration("soon").is_err());
/// ```
pub fn parse_duration(duration: &str) -> Result<Duration, String> {
    let duration = duration.trim();
    let (number, unit) = duration.split_at(number_part_len(duration));

    let value = number
        .parse::<u64>()
        .map_err(|_| format!("Invalid duration format: {}", duration))?;

    let scale = |factor: u64| {
        value
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("Invalid duration format: {}", duration))
    };

    match unit {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(value)),
        "ms" | "msec" | "msecs" | "millis" => Ok(Duration::from_millis(value)),
        "m" | "min" | "mins" | "minute" | "minutes" => scale(60),
        "h" | "hr" | "hrs" | "hour" | "hours" => scale(3600),
        _ => Err(format!("Invalid duration format: {}", duration)),
    }
}

fn number_part_len(duration: &str) -> usize {
    duration
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(duration.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("3"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("3seconds"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("150ms"), Ok(Duration::from_millis(150)));
        assert_eq!(parse_duration("150millis"), Ok(Duration::from_millis(150)));
        assert_eq!(parse_duration("2min"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1hour"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration(" 4s "), Ok(Duration::from_secs(4)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("5minutesx").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn test_parse_duration_overflow_is_rejected() {
        assert!(parse_duration("400000000000000000m").is_err());
        assert!(parse_duration("18446744073709551615h").is_err());
        assert!(parse_duration("99999999999999999999s").is_err());
        assert_eq!(parse_duration("30m"), Ok(Duration::from_secs(1800)));
    }
}
