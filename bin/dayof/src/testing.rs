//! In-memory state for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use db::MemoryStore;
use email::{Email, MailError, Mailer};
use parking_lot::Mutex;
use rpc::procedure::CreateEventBody;
use schema::{Event, Invite};

use crate::prelude::*;

/// Keeps every email instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::DeliveryFailed(format!("refusing to send to {}", email.to)));
        }

        self.sent.lock().push(email);

        Ok(())
    }
}

pub struct Harness {
    pub state: ServerState,
    pub db: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl Harness {
    pub fn new() -> Harness {
        let db = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());

        Harness {
            state: ServerState::new(Config::default(), db.clone(), mailer.clone()),
            db,
            mailer,
        }
    }

    /// Creates an event owned by `owner` through the regular code path.
    pub async fn event(&self, owner: &str, name: &str) -> Event {
        crate::rpc::event::event_create::create_event(
            self.state.clone(),
            Authorization::new(owner),
            CreateEventBody { name: name.to_owned() },
        )
        .await
        .unwrap()
    }

    /// Seeds a pending invite directly, with arbitrary timestamps.
    pub fn invite(&self, event: &Event, email: &str, created_at: Timestamp, expires_at: Timestamp) -> Invite {
        let invite = Invite::pending(
            event.event_id.clone(),
            event.owner_id.clone(),
            email.into(),
            created_at,
            expires_at,
        );

        self.db.insert_invite(invite.clone());

        invite
    }
}

/// Two days ago
pub fn past() -> Timestamp {
    Timestamp::now_utc().saturating_sub(schema::Duration::days(2))
}

/// A week from now
pub fn future() -> Timestamp {
    Timestamp::now_utc().saturating_add(schema::Duration::days(7))
}
