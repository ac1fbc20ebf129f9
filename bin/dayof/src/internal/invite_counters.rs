use db::{Batch, Write};
use schema::InviteStatus;

use crate::prelude::*;

/// Recomputes the denormalized `pending_invites` and `invited_emails` on an event
/// from its invites. Errors are logged, never surfaced.
pub async fn update_event_invite_stats(state: &ServerState, event_id: &str) {
    if let Err(e) = refresh_counters(state, event_id).await {
        log::error!("Error updating invite counters for event {event_id}: {e}");
    }
}

async fn refresh_counters(state: &ServerState, event_id: &str) -> Result<(), Error> {
    if state.db.get_event(event_id).await?.is_none() {
        log::debug!("Event {event_id} no longer exists, skipping invite counters");
        return Ok(());
    }

    let invites = state.db.list_event_invites(event_id).await?;

    let mut invited_emails: Vec<SmolStr> = invites
        .iter()
        .filter(|invite| invite.status == InviteStatus::Pending)
        .map(|invite| invite.invitee_email.clone())
        .collect();

    let pending_invites = invited_emails.len() as u32;

    invited_emails.sort_unstable();
    invited_emails.dedup();

    log::debug!("Event {event_id} has {pending_invites} pending invites to {} addresses", invited_emails.len());

    let mut batch = Batch::with_capacity(1);
    batch.push(Write::SetEventInviteCounters {
        event_id: event_id.into(),
        pending_invites,
        invited_emails,
    });

    state.db.commit(batch).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{future, past, Harness};

    #[tokio::test]
    async fn test_counts_only_pending() {
        let h = Harness::new();
        let event = h.event("owner", "Picnic").await;

        h.invite(&event, "b@x.com", past(), future());
        h.invite(&event, "a@x.com", past(), future());
        h.invite(&event, "a@x.com", past(), future());

        let mut accepted = h.invite(&event, "c@x.com", past(), future());
        accepted.status = InviteStatus::Accepted;
        h.db.insert_invite(accepted);

        update_event_invite_stats(&h.state, &event.event_id).await;

        let event = h.db.get_event(&event.event_id).await.unwrap().unwrap();
        assert_eq!(event.pending_invites, 3);
        assert_eq!(event.invited_emails, vec![SmolStr::new("a@x.com"), SmolStr::new("b@x.com")]);
    }

    #[tokio::test]
    async fn test_missing_event_is_skipped() {
        let h = Harness::new();

        update_event_invite_stats(&h.state, "nope").await;
        assert!(h.db.get_event("nope").await.unwrap().is_none());
    }
}
