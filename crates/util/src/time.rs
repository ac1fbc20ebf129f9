use smol_str::SmolStr;
use timestamp::{Duration, Timestamp};

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Calendar date of the timestamp as `YYYY-MM-DD`, timestamps are always UTC.
pub fn utc_date(ts: Timestamp) -> SmolStr {
    let (year, month, day) = ts.date().to_calendar_date();

    SmolStr::new(format!("{year:04}-{:02}-{day:02}", month as u8))
}

/// Milliseconds since the unix epoch
#[inline]
pub fn unix_ms(ts: Timestamp) -> i64 {
    ts.duration_since(Timestamp::UNIX_EPOCH).whole_milliseconds() as i64
}

#[inline]
pub fn from_unix_ms(ms: i64) -> Timestamp {
    Timestamp::UNIX_EPOCH.saturating_add(Duration::milliseconds(ms))
}

/// Milliseconds elapsed from `earlier` to `later`, negative if `later` is actually earlier.
#[inline]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> i64 {
    unix_ms(later) - unix_ms(earlier)
}

/// How long to wait from `now` until the next occurrence of `hour`:00 UTC.
///
/// If `now` is exactly on the hour, the next run is a full day away.
pub fn until_next_hour_of_day(now: Timestamp, hour: u8) -> std::time::Duration {
    let now_ms = unix_ms(now);
    let into_day = now_ms.rem_euclid(MS_PER_DAY);
    let target = (hour as i64 % 24) * MS_PER_HOUR;

    let mut wait = target - into_day;
    if wait <= 0 {
        wait += MS_PER_DAY;
    }

    std::time::Duration::from_millis(wait as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_date() {
        // 2024-03-05T23:59:59.999Z
        let ts = from_unix_ms(1_709_683_199_999);
        assert_eq!(utc_date(ts), "2024-03-05");

        let ts = from_unix_ms(1_709_683_200_000);
        assert_eq!(utc_date(ts), "2024-03-06");
    }

    #[test]
    fn test_unix_ms() {
        assert_eq!(unix_ms(from_unix_ms(1_709_683_200_123)), 1_709_683_200_123);
        assert_eq!(unix_ms(Timestamp::UNIX_EPOCH), 0);
    }

    #[test]
    fn test_until_next_hour() {
        // 2024-03-06T01:30:00Z
        let ts = from_unix_ms(1_709_683_200_000 + 90 * 60 * 1000);

        assert_eq!(until_next_hour_of_day(ts, 3).as_secs(), 90 * 60);
        assert_eq!(until_next_hour_of_day(ts, 1).as_secs(), (24 * 60 - 30) * 60);

        let on_the_hour = from_unix_ms(1_709_683_200_000 + 3 * MS_PER_HOUR);
        assert_eq!(until_next_hour_of_day(on_the_hour, 3).as_secs(), 24 * 60 * 60);
    }
}
