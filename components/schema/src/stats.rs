use util::time::{elapsed_ms, utc_date, MS_PER_HOUR};

use crate::*;

/// Rolling per-user invite counters
///
/// The hourly and daily counters reset on different clocks, so
/// `invites_sent_this_hour <= invites_sent_today` does not always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteStats {
    pub invites_sent_today: u32,
    pub invites_sent_this_hour: u32,
    /// UTC calendar date (`YYYY-MM-DD`) the daily counter is valid for
    pub last_reset_date: SmolStr,
    pub last_invite_timestamp: Timestamp,
}

impl InviteStats {
    /// Zeroed stats for a user who has never sent an invite.
    pub fn fresh(now: Timestamp) -> InviteStats {
        InviteStats {
            invites_sent_today: 0,
            invites_sent_this_hour: 0,
            last_reset_date: utc_date(now),
            last_invite_timestamp: now,
        }
    }

    /// Applies window resets as of `now`.
    ///
    /// A new day zeroes both counters. Otherwise, more than an hour since the last
    /// invite zeroes only the hourly counter.
    pub fn roll_over(&mut self, now: Timestamp) {
        let today = utc_date(now);

        if self.last_reset_date != today {
            self.invites_sent_today = 0;
            self.invites_sent_this_hour = 0;
            self.last_reset_date = today;
        } else if elapsed_ms(self.last_invite_timestamp, now) > MS_PER_HOUR {
            self.invites_sent_this_hour = 0;
        }
    }

    /// Records `count` invites sent at `now`, after rolling over stale windows.
    pub fn record(&mut self, count: u32, now: Timestamp) {
        self.roll_over(now);

        self.invites_sent_today = self.invites_sent_today.saturating_add(count);
        self.invites_sent_this_hour = self.invites_sent_this_hour.saturating_add(count);
        self.last_invite_timestamp = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLimits {
    pub max_per_hour: u32,
    pub max_per_day: u32,
}

impl Default for InviteLimits {
    fn default() -> Self {
        InviteLimits {
            max_per_hour: InviteLimits::MAX_PER_HOUR,
            max_per_day: InviteLimits::MAX_PER_DAY,
        }
    }
}

impl InviteLimits {
    /// Fixed quotas, not read from configuration or the environment
    pub const MAX_PER_HOUR: u32 = 20;
    pub const MAX_PER_DAY: u32 = 100;

    /// Whether at least one more invite may be sent. Expects rolled-over stats.
    pub fn allows(&self, stats: &InviteStats) -> bool {
        stats.invites_sent_this_hour < self.max_per_hour && stats.invites_sent_today < self.max_per_day
    }

    /// Whether a batch of `count` invites fits in both windows.
    pub fn allows_batch(&self, stats: &InviteStats, count: u32) -> bool {
        count <= self.remaining_this_hour(stats) && count <= self.remaining_today(stats)
    }

    pub fn remaining_this_hour(&self, stats: &InviteStats) -> u32 {
        self.max_per_hour.saturating_sub(stats.invites_sent_this_hour)
    }

    pub fn remaining_today(&self, stats: &InviteStats) -> u32 {
        self.max_per_day.saturating_sub(stats.invites_sent_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-06T12:00:00Z
    const NOON: i64 = 1_709_726_400_000;

    fn at(offset_ms: i64) -> Timestamp {
        util::time::from_unix_ms(NOON + offset_ms)
    }

    #[test]
    fn test_one_left_today() {
        let now = at(0);
        let mut stats = InviteStats {
            invites_sent_today: 99,
            invites_sent_this_hour: 5,
            last_reset_date: utc_date(now),
            last_invite_timestamp: at(-10 * 60 * 1000),
        };

        stats.roll_over(now);

        let limits = InviteLimits::default();
        assert!(limits.allows(&stats));
        assert!(limits.allows_batch(&stats, 1));
        assert!(!limits.allows_batch(&stats, 2));
    }

    #[test]
    fn test_hourly_reset_keeps_daily() {
        let mut stats = InviteStats {
            invites_sent_today: 40,
            invites_sent_this_hour: 20,
            last_reset_date: utc_date(at(0)),
            last_invite_timestamp: at(0),
        };

        let limits = InviteLimits::default();

        stats.roll_over(at(MS_PER_HOUR));
        assert_eq!(stats.invites_sent_this_hour, 20, "exactly one hour is not past the window");
        assert!(!limits.allows(&stats));

        stats.roll_over(at(MS_PER_HOUR + 1));
        assert_eq!(stats.invites_sent_this_hour, 0);
        assert_eq!(stats.invites_sent_today, 40);
        assert!(limits.allows(&stats));
    }

    #[test]
    fn test_day_change_resets_both() {
        let mut stats = InviteStats {
            invites_sent_today: 100,
            invites_sent_this_hour: 12,
            last_reset_date: "2024-03-05".into(),
            // only 30 minutes ago, yet the hourly counter still resets with the day
            last_invite_timestamp: at(-30 * 60 * 1000),
        };

        stats.roll_over(at(0));

        assert_eq!(stats.invites_sent_today, 0);
        assert_eq!(stats.invites_sent_this_hour, 0);
        assert_eq!(stats.last_reset_date, "2024-03-06");
    }

    #[test]
    fn test_record_rolls_then_adds() {
        let mut stats = InviteStats::fresh(at(-2 * MS_PER_HOUR));
        stats.record(3, at(-2 * MS_PER_HOUR));
        stats.record(2, at(0));

        assert_eq!(stats.invites_sent_today, 5);
        assert_eq!(stats.invites_sent_this_hour, 2);
        assert_eq!(stats.last_invite_timestamp, at(0));

        let limits = InviteLimits::default();
        assert_eq!(limits.remaining_this_hour(&stats), 18);
        assert_eq!(limits.remaining_today(&stats), 95);
    }
}
