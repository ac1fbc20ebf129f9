//! Per-user invite quotas, one sliding hour and one UTC calendar day.
//!
//! The check and the counter update are separate steps, so two concurrent batches
//! may both pass the check. The limit is soft under that race.

use schema::{InviteLimits, InviteStats};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitCheck {
    pub allowed: bool,

    /// Stored stats with window resets applied as of the check, never written back
    pub stats: InviteStats,
}

pub async fn check_rate_limit(
    state: &ServerState,
    user_id: &str,
    limits: InviteLimits,
    now: Timestamp,
) -> Result<RateLimitCheck, Error> {
    let mut stats = match state.db.get_invite_stats(user_id).await? {
        Some(stats) => stats,
        None => InviteStats::fresh(now),
    };

    stats.roll_over(now);

    Ok(RateLimitCheck {
        allowed: limits.allows(&stats),
        stats,
    })
}

/// Adds `count` to both windows, resetting stale windows first, in one transaction.
pub async fn update_invite_stats(
    state: &ServerState,
    user_id: &str,
    count: u32,
    now: Timestamp,
) -> Result<InviteStats, Error> {
    let stats = state
        .db
        .update_invite_stats(
            user_id,
            Box::new(move |current| {
                let mut stats = current.unwrap_or_else(|| InviteStats::fresh(now));
                stats.record(count, now);
                stats
            }),
        )
        .await?;

    log::trace!(
        "User {user_id} has sent {} invites today, {} this hour",
        stats.invites_sent_today,
        stats.invites_sent_this_hour
    );

    Ok(stats)
}
