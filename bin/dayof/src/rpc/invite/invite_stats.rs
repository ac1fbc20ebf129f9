use rpc::procedure::GetInviteStatsBody;
use rpc::reply::InviteStatsReply;

use crate::internal::rate_limit;
use crate::prelude::*;

/// Current invite usage for the caller, with stale windows shown as reset.
pub async fn get_invite_stats(
    state: ServerState,
    auth: Authorization,
    body: GetInviteStatsBody,
) -> Result<InviteStatsReply, Error> {
    if body.user_id.is_empty() {
        return Err(CommonError::InvalidArgument("userId is required").into());
    }

    if body.user_id != *auth.user_id_ref() {
        return Err(CommonError::PermissionDenied("Can only read your own invite stats").into());
    }

    let limits = schema::InviteLimits::default();

    let check = rate_limit::check_rate_limit(&state, &body.user_id, limits, Timestamp::now_utc()).await?;

    Ok(InviteStatsReply {
        stats: check.stats,
        max_per_hour: limits.max_per_hour,
        max_per_day: limits.max_per_day,
    })
}
