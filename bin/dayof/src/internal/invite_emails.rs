use email::{scenarios::EventInvite, Email};
use schema::{Event, Invite};

use crate::prelude::*;

/// Sends one invite email per invite. The invites are already committed,
/// so failed deliveries are logged and otherwise ignored.
///
/// Returns how many emails were handed to the mailer successfully.
pub async fn send_invite_emails(state: &ServerState, event: &Event, inviter_id: &str, invites: &[Invite]) -> usize {
    let inviter_name = match state.db.get_user(inviter_id).await {
        Ok(Some(user)) => user.display_name,
        Ok(None) => SmolStr::new_inline("Someone"),
        Err(e) => {
            log::warn!("Unable to load inviter {inviter_id} for invite emails: {e}");
            SmolStr::new_inline("Someone")
        }
    };

    let app_url = state.config().email.app_url.trim_end_matches('/').to_owned();

    let sends = invites.iter().map(|invite| {
        let email = Email::new(
            invite.invitee_email.clone(),
            format!("You're invited to {}", event.name),
            EventInvite::new(
                inviter_name.as_str(),
                event.name.as_str(),
                format!("{app_url}/invite/{}", invite.token),
                util::time::utc_date(invite.expires_at).as_str(),
            ),
        );

        state.mailer.send(email)
    });

    let results = futures::future::join_all(sends).await;

    let mut sent = 0;

    for (invite, res) in invites.iter().zip(results) {
        match res {
            Ok(()) => sent += 1,
            Err(e) => log::warn!("Failed to send invite email for invite {}: {e}", invite.invite_id),
        }
    }

    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{future, past, Harness};
    use schema::User;

    #[tokio::test]
    async fn test_renders_accept_link() {
        let h = Harness::new();
        let event = h.event("owner", "Picnic").await;

        h.db.put_user(User {
            user_id: "owner".into(),
            display_name: "Sam".into(),
            email: None,
        })
        .await
        .unwrap();

        let invite = h.invite(&event, "a@x.com", past(), future());

        assert_eq!(send_invite_emails(&h.state, &event, "owner", &[invite.clone()]).await, 1);

        let sent = h.mailer.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "You're invited to Picnic");

        let email::Scenario::EventInvite(ref scenario) = sent[0].scenario;
        assert_eq!(scenario.inviter_name, "Sam");
        assert_eq!(scenario.accept_url, format!("https://dayof.app/invite/{}", invite.token));
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let h = Harness::new();
        let event = h.event("owner", "Picnic").await;

        let invites = [h.invite(&event, "a@x.com", past(), future()), h.invite(&event, "b@x.com", past(), future())];

        h.mailer.fail_all();
        assert_eq!(send_invite_emails(&h.state, &event, "owner", &invites).await, 0);
    }
}
