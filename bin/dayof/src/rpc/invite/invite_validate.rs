use rpc::procedure::ValidateInviteTokenBody;
use rpc::reply::{InviteTokenError, InviteView, ValidateInviteReply};
use schema::invite::TOKEN_LEN;

use crate::prelude::*;

/// Checks a token without side effects. Anyone holding the token may ask.
///
/// Token problems are reported in the reply, not as errors.
pub async fn validate_invite_token(
    state: ServerState,
    body: ValidateInviteTokenBody,
) -> Result<ValidateInviteReply, Error> {
    if body.token.chars().count() != TOKEN_LEN {
        return Ok(ValidateInviteReply::invalid(InviteTokenError::InvalidToken));
    }

    let Some(invite) = state.db.find_invite_by_token(&body.token).await? else {
        return Ok(ValidateInviteReply::invalid(InviteTokenError::NotFound));
    };

    if invite.is_expired_at(Timestamp::now_utc()) {
        return Ok(ValidateInviteReply::invalid(InviteTokenError::Expired));
    }

    if invite.is_accepted() {
        return Ok(ValidateInviteReply::invalid(InviteTokenError::AlreadyUsed));
    }

    let (event, inviter) = tokio::join!(
        state.db.get_event(&invite.event_id),
        state.db.get_user(&invite.inviter_user_id),
    );

    // best-effort, a missing or unreadable event/inviter is just left out
    let event = event.unwrap_or_else(|e| {
        log::warn!("Unable to load event {} for invite: {e}", invite.event_id);
        None
    });

    let inviter = inviter.unwrap_or_else(|e| {
        log::warn!("Unable to load inviter {} for invite: {e}", invite.inviter_user_id);
        None
    });

    Ok(ValidateInviteReply::valid(InviteView { invite, event, inviter }))
}
