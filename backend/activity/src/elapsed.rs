//! Human-readable "time since" strings.

use chrono::Duration;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Format an elapsed duration using the coarsest unit that applies, plus the
/// next unit down:
///
/// - `"2 days, 5 hours"` from one full day upward
/// - `"1 hours 23 minutes"` from one full hour
/// - `"1 minutes 30 seconds"` from one full minute
/// - `"45 seconds"` otherwise
///
/// Units are never pluralised differently; negative durations read as zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    if days >= 1 {
        format!("{days} days, {hours} hours")
    } else if hours >= 1 {
        format!("{hours} hours {minutes} minutes")
    } else if minutes >= 1 {
        format!("{minutes} minutes {seconds} seconds")
    } else {
        format!("{seconds} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: i64) -> String {
        format_elapsed(Duration::seconds(n))
    }

    #[test]
    fn test_days_and_hours() {
        assert_eq!(secs(90_000), "1 days, 1 hours");
        assert_eq!(secs(3 * SECS_PER_DAY + 59), "3 days, 0 hours");
    }

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(secs(5_000), "1 hours 23 minutes");
        assert_eq!(secs(SECS_PER_DAY - 1), "23 hours 59 minutes");
    }

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(secs(90), "1 minutes 30 seconds");
        assert_eq!(secs(60), "1 minutes 0 seconds");
        assert_eq!(secs(SECS_PER_HOUR - 1), "59 minutes 59 seconds");
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(secs(45), "45 seconds");
        assert_eq!(secs(0), "0 seconds");
        assert_eq!(secs(-30), "0 seconds");
    }
}
