//! Time parsing and formatting utilities

use crate::error::{SplitError, SplitResult};

/// Parse a human time expression into seconds.
///
/// Accepted forms, tried in order:
/// - plain digits: `"120"` -> 120.0
/// - unit composite: `"1h30m"`, `"45s"`, `"2m"` (any subset of h/m/s)
/// - colon-delimited: `"1:30:00"` (HH:MM:SS) or `"90:30"` (MM:SS)
pub fn parse_time_expression(input: &str) -> SplitResult<f64> {
    let time_str = input.trim().to_lowercase();

    if !time_str.is_empty() && time_str.chars().all(|c| c.is_ascii_digit()) {
        // Pure digits always fit in f64's integer range for any sane duration
        return Ok(time_str.parse::<u64>().map_err(|_| invalid(input))? as f64);
    }

    if let Some(seconds) = parse_unit_composite(&time_str) {
        return Ok(seconds);
    }

    if time_str.contains(':') {
        return parse_colon_delimited(&time_str).ok_or_else(|| invalid(input));
    }

    Err(invalid(input))
}

fn invalid(input: &str) -> SplitError {
    SplitError::InvalidTimeFormat {
        input: input.trim().to_string(),
    }
}

/// Parse a composite of `<int>h`, `<int>m`, `<int>s` components.
///
/// A unit letter without preceding digits contributes 0. Returns `None`
/// when no unit amounts to a positive total, so the colon forms get a try.
fn parse_unit_composite(time_str: &str) -> Option<f64> {
    let mut total: u64 = 0;
    for (unit, factor) in [('h', 3600), ('m', 60), ('s', 1)] {
        if let Some(pos) = time_str.find(unit) {
            let digits: String = time_str[..pos]
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            if !digits.is_empty() {
                total += digits.parse::<u64>().ok()? * factor;
            }
        }
    }
    if total > 0 {
        Some(total as f64)
    } else {
        None
    }
}

/// Parse `HH:MM:SS` or `MM:SS` with integer components.
fn parse_colon_delimited(time_str: &str) -> Option<f64> {
    let parts: Vec<&str> = time_str.split(':').collect();
    match parts.len() {
        3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let minutes: u64 = parts[1].parse().ok()?;
            let seconds: u64 = parts[2].parse().ok()?;
            Some((hours * 3600 + minutes * 60 + seconds) as f64)
        }
        2 => {
            let minutes: u64 = parts[0].parse().ok()?;
            let seconds: u64 = parts[1].parse().ok()?;
            Some((minutes * 60 + seconds) as f64)
        }
        _ => None,
    }
}

/// Format a duration in seconds as a human-readable string.
///
/// `30 -> "30s"`, `90 -> "1m 30s"`, `3661 -> "1h 1m 1s"`. Fractional
/// seconds are truncated.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_time_expression("120").unwrap(), 120.0);
        assert_eq!(parse_time_expression(" 90 ").unwrap(), 90.0);
    }

    #[test]
    fn parses_unit_composites() {
        assert_eq!(parse_time_expression("2m").unwrap(), 120.0);
        assert_eq!(parse_time_expression("1h30m").unwrap(), 5400.0);
        assert_eq!(parse_time_expression("1h30m15s").unwrap(), 5415.0);
        assert_eq!(parse_time_expression("45s").unwrap(), 45.0);
        assert_eq!(parse_time_expression("1H30M").unwrap(), 5400.0);
    }

    #[test]
    fn parses_colon_delimited() {
        assert_eq!(parse_time_expression("1:30:00").unwrap(), 5400.0);
        assert_eq!(parse_time_expression("90:30").unwrap(), 5430.0);
        assert_eq!(parse_time_expression("0:05:00").unwrap(), 300.0);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse_time_expression("abc"),
            Err(SplitError::InvalidTimeFormat { .. })
        ));
        assert!(parse_time_expression("").is_err());
        assert!(parse_time_expression("1:2:3:4").is_err());
        assert!(parse_time_expression("xx:yy").is_err());
    }

    #[test]
    fn formats_duration_tiers() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
        assert_eq!(format_duration(59.9), "59s");
    }
}
