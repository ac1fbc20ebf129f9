use db::{Batch, Write};
use rpc::procedure::SendInvitesBody;
use rpc::reply::{RateLimitInfo, SendInvitesReply};
use schema::{validation::filter_valid_emails, Invite, InviteLimits};

use crate::internal::{invite_emails, rate_limit};
use crate::prelude::*;

pub async fn send_invites(
    state: ServerState,
    auth: Authorization,
    body: SendInvitesBody,
) -> Result<SendInvitesReply, Error> {
    if body.event_id.is_empty() || body.emails.is_empty() {
        return Err(CommonError::InvalidArgument("eventId and emails are required").into());
    }

    let emails = filter_valid_emails(&body.emails);

    if emails.is_empty() {
        return Err(CommonError::InvalidArgument("No valid email addresses provided").into());
    }

    let Some(event) = state.db.get_event(&body.event_id).await? else {
        return Err(CommonError::NotFound("event").into());
    };

    if event.owner_id != *auth.user_id_ref() {
        return Err(CommonError::PermissionDenied("Only the event owner can send invites").into());
    }

    let limits = InviteLimits::default();
    let expiry = state.config().invites.expiry();

    let now = Timestamp::now_utc();

    let check = rate_limit::check_rate_limit(&state, auth.user_id_ref(), limits, now).await?;

    if !check.allowed {
        return Err(CommonError::RateLimited(
            format!(
                "You can send at most {} invites per hour and {} per day",
                limits.max_per_hour, limits.max_per_day
            )
            .into(),
        )
        .into());
    }

    let count = emails.len() as u32;

    if !limits.allows_batch(&check.stats, count) {
        let remaining = limits.remaining_this_hour(&check.stats).min(limits.remaining_today(&check.stats));

        return Err(CommonError::RateLimited(
            format!("Only {remaining} more invites can be sent right now, tried to send {count}").into(),
        )
        .into());
    }

    let expires_at = now.saturating_add(expiry);

    let invites: Vec<Invite> = emails
        .into_iter()
        .map(|email| Invite::pending(event.event_id.clone(), auth.user_id(), email, now, expires_at))
        .collect();

    let batch: Batch = invites.iter().cloned().map(Write::CreateInvite).collect();

    state.db.commit(batch).await?;

    // the invites exist now, so a failure here must not be reported as a failed send
    let stats = match rate_limit::update_invite_stats(&state, auth.user_id_ref(), count, now).await {
        Ok(stats) => stats,
        Err(e) => {
            log::error!("Error updating invite stats for user {}: {e}", auth.user_id_ref());

            let mut stats = check.stats;
            stats.record(count, now);
            stats
        }
    };

    let delivered = invite_emails::send_invite_emails(&state, &event, auth.user_id_ref(), &invites).await;

    log::info!(
        "User {} sent {count} invites for event {}, {delivered} emails delivered",
        auth.user_id_ref(),
        event.event_id
    );

    Ok(SendInvitesReply {
        success: true,
        invites_sent: count,
        rate_limit_info: RateLimitInfo {
            remaining_today: limits.remaining_today(&stats),
            remaining_this_hour: limits.remaining_this_hour(&stats),
        },
    })
}
