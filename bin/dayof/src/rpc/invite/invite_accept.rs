use db::{Batch, Write};
use rpc::procedure::AcceptInviteBody;
use rpc::reply::JoinedEventReply;
use schema::{invite::TOKEN_LEN, EventMembership, InviteStatus, MemberRole};

use crate::prelude::*;

/// Redeems an invite for the calling user, adding them to the event.
///
/// The invite's transition out of `pending` and the new membership commit together,
/// so of two concurrent redemptions only one succeeds. A caller who is already a member
/// keeps their existing membership and role.
pub async fn accept_invite(
    state: ServerState,
    auth: Authorization,
    body: AcceptInviteBody,
) -> Result<JoinedEventReply, Error> {
    let invite = match body.token.chars().count() == TOKEN_LEN {
        true => state.db.find_invite_by_token(&body.token).await?,
        false => None,
    };

    let Some(invite) = invite else {
        return Err(CommonError::NotFound("invite").into());
    };

    let now = Timestamp::now_utc();

    if invite.is_expired_at(now) {
        return Err(CommonError::FailedPrecondition("Invite has expired").into());
    }

    if invite.is_accepted() {
        return Err(CommonError::FailedPrecondition("Invite has already been used").into());
    }

    if invite.status != InviteStatus::Pending {
        return Err(CommonError::FailedPrecondition("Invite is no longer valid").into());
    }

    let mut batch = Batch::with_capacity(2);

    batch
        .push(Write::TransitionInvite {
            event_id: invite.event_id.clone(),
            invite_id: invite.invite_id.clone(),
            from: InviteStatus::Pending,
            to: InviteStatus::Accepted,
            at: Some(now),
        })
        .push(Write::JoinMember(EventMembership {
            user_id: auth.user_id(),
            event_id: invite.event_id.clone(),
            joined_at: now,
            role: MemberRole::Member,
            invited_by: Some(invite.inviter_user_id.clone()),
        }));

    state.db.commit(batch).await?;

    log::debug!("User {} accepted invite {} to event {}", auth.user_id_ref(), invite.invite_id, invite.event_id);

    Ok(JoinedEventReply {
        success: true,
        event_id: invite.event_id,
    })
}
