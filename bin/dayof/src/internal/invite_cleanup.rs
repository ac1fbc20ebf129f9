use db::{Batch, Write};
use schema::InviteStatus;

use crate::prelude::*;

/// Marks every pending invite past its expiry as `expired`, in one batch.
///
/// Returns how many invites were expired. Errors are logged and count as zero.
pub async fn cleanup_expired_invites(state: ServerState) -> usize {
    let now = Timestamp::now_utc();

    match expire_invites(&state, now).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("Error cleaning up expired invites: {e}");
            0
        }
    }
}

async fn expire_invites(state: &ServerState, now: Timestamp) -> Result<usize, Error> {
    let expired = state.db.list_expired_pending(now).await?;

    if expired.is_empty() {
        log::info!("No expired invites to clean up");
        return Ok(0);
    }

    let batch: Batch = expired
        .iter()
        .map(|invite| Write::TransitionInvite {
            event_id: invite.event_id.clone(),
            invite_id: invite.invite_id.clone(),
            from: InviteStatus::Pending,
            to: InviteStatus::Expired,
            at: None,
        })
        .collect();

    state.db.commit(batch).await?;

    log::info!("Marked {} invites as expired", expired.len());

    Ok(expired.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{future, past, Harness};

    #[tokio::test]
    async fn test_expires_only_stale_pending() {
        let h = Harness::new();
        let event = h.event("owner", "Picnic").await;

        let stale = h.invite(&event, "a@x.com", past(), past());
        let fresh = h.invite(&event, "b@x.com", past(), future());

        let mut used = h.invite(&event, "c@x.com", past(), past());
        used.status = InviteStatus::Accepted;
        h.db.insert_invite(used.clone());

        assert_eq!(cleanup_expired_invites(h.state.clone()).await, 1);

        let status = |id: SmolStr| {
            let db = h.db.clone();
            let event_id = event.event_id.clone();
            async move { db.get_invite(&event_id, &id).await.unwrap().unwrap().status }
        };

        assert_eq!(status(stale.invite_id).await, InviteStatus::Expired);
        assert_eq!(status(fresh.invite_id).await, InviteStatus::Pending);
        assert_eq!(status(used.invite_id).await, InviteStatus::Accepted);

        // nothing left on a second pass
        assert_eq!(cleanup_expired_invites(h.state.clone()).await, 0);
    }

    #[tokio::test]
    async fn test_failed_commit_changes_nothing() {
        let h = Harness::new();
        let event = h.event("owner", "Picnic").await;

        let a = h.invite(&event, "a@x.com", past(), past());
        let b = h.invite(&event, "b@x.com", past(), past());

        h.db.fail_next_commit();
        assert_eq!(cleanup_expired_invites(h.state.clone()).await, 0);

        for invite in [&a, &b] {
            let stored = h.db.get_invite(&event.event_id, &invite.invite_id).await.unwrap().unwrap();
            assert_eq!(stored.status, InviteStatus::Pending);
        }

        assert_eq!(cleanup_expired_invites(h.state.clone()).await, 2);
    }
}
