use db::{Batch, StoreError, Write};
use rpc::procedure::CreateEventBody;
use schema::{Event, EventMembership, MemberRole};

use crate::prelude::*;

pub const JOIN_CODE_LEN: usize = 6;
pub const MAX_EVENT_NAME_LEN: usize = 100;

/// Join codes are random, so a collision is retried a few times before giving up.
const MAX_JOIN_CODE_ATTEMPTS: usize = 3;

pub async fn create_event(state: ServerState, auth: Authorization, body: CreateEventBody) -> Result<Event, Error> {
    let name = body.name.trim();

    if name.is_empty() || name.chars().count() > MAX_EVENT_NAME_LEN {
        return Err(CommonError::InvalidArgument("Event name must be between 1 and 100 characters").into());
    }

    let now = Timestamp::now_utc();
    let event_id = schema::new_id();

    for _ in 0..MAX_JOIN_CODE_ATTEMPTS {
        let event = Event {
            event_id: event_id.clone(),
            name: name.into(),
            owner_id: auth.user_id(),
            join_code: util::rng::gen_code(JOIN_CODE_LEN).into(),
            created_at: now,
            pending_invites: 0,
            invited_emails: Vec::new(),
        };

        let mut batch = Batch::with_capacity(2);

        batch.push(Write::PutEvent(event.clone())).push(Write::CreateMember(EventMembership {
            user_id: auth.user_id(),
            event_id: event_id.clone(),
            joined_at: now,
            role: MemberRole::Owner,
            invited_by: None,
        }));

        match state.db.commit(batch).await {
            Ok(()) => {
                log::debug!("User {} created event {}", auth.user_id_ref(), event.event_id);
                return Ok(event);
            }
            Err(StoreError::Conflict(what)) => log::debug!("Join code collision ({what}), retrying"),
            Err(e) => return Err(e.into()),
        }
    }

    Err(Error::InternalErrorStatic("Unable to allocate a join code"))
}
