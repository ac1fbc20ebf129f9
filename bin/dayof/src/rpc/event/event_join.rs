use db::{Batch, Write};
use rpc::procedure::JoinEventBody;
use rpc::reply::JoinedEventReply;
use schema::{EventMembership, MemberRole};

use crate::prelude::*;

/// Joins an event by its short code, without an invite.
pub async fn join_event(state: ServerState, auth: Authorization, body: JoinEventBody) -> Result<JoinedEventReply, Error> {
    let code = body.join_code.trim().to_ascii_uppercase();

    if code.is_empty() {
        return Err(CommonError::InvalidArgument("joinCode is required").into());
    }

    let Some(event) = state.db.find_event_by_join_code(&code).await? else {
        return Err(CommonError::NotFound("event").into());
    };

    if state.db.get_member(&event.event_id, auth.user_id_ref()).await?.is_some() {
        return Err(CommonError::FailedPrecondition("Already a member of this event").into());
    }

    let mut batch = Batch::with_capacity(1);
    batch.push(Write::CreateMember(EventMembership {
        user_id: auth.user_id(),
        event_id: event.event_id.clone(),
        joined_at: Timestamp::now_utc(),
        role: MemberRole::Member,
        invited_by: None,
    }));

    state.db.commit(batch).await?;

    Ok(JoinedEventReply {
        success: true,
        event_id: event.event_id,
    })
}
