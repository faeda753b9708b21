// ── Attribute string forms ──

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SECOND;

/// Render a duration as `H:MM:SS`, with `.ffffff` when there are
/// sub-second microseconds and a `N day(s), ` prefix past 24 hours.
///
/// Negative durations borrow whole days, so `-1s` is `-1 day, 23:59:59`.
pub fn format_duration(delta: TimeDelta) -> String {
    let total = i128::from(delta.num_seconds()) * MICROS_PER_SECOND
        + i128::from(delta.subsec_nanos() / 1_000);

    let days = total.div_euclid(MICROS_PER_DAY);
    let rem = total.rem_euclid(MICROS_PER_DAY);
    let hours = rem / (3_600 * MICROS_PER_SECOND);
    let minutes = rem / (60 * MICROS_PER_SECOND) % 60;
    let seconds = rem / MICROS_PER_SECOND % 60;
    let micros = rem % MICROS_PER_SECOND;

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

/// RFC 3339 with an explicit `+00:00` offset.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(TimeDelta::zero()), "0:00:00");
        assert_eq!(format_duration(TimeDelta::minutes(10)), "0:10:00");
        assert_eq!(format_duration(TimeDelta::seconds(3_725)), "1:02:05");
        assert_eq!(
            format_duration(TimeDelta::milliseconds(1_500)),
            "0:00:01.500000"
        );
        assert_eq!(
            format_duration(TimeDelta::hours(49) + TimeDelta::seconds(1)),
            "2 days, 1:00:01"
        );
        assert_eq!(format_duration(TimeDelta::hours(24)), "1 day, 0:00:00");
        assert_eq!(format_duration(TimeDelta::seconds(-1)), "-1 day, 23:59:59");
    }

    #[test]
    fn timestamps_use_numeric_offset() {
        let at = Utc.timestamp_millis_opt(1_620_000_000_000).unwrap();
        assert_eq!(format_timestamp(at), "2021-05-03T00:00:00+00:00");
    }
}
