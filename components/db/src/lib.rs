//! Document store for events, members, invites and per-user invite stats.
//!
//! Every multi-document mutation goes through [`Store::commit`] with a [`Batch`],
//! which either applies completely or not at all.

extern crate tracing as log;

use schema::{Event, EventMembership, Invite, InviteStats, SmolStr, Timestamp, User};

pub mod batch;
pub mod error;
pub mod memory;

pub use batch::{Batch, Write};
pub use error::StoreError;
pub use memory::MemoryStore;

/// Emitted on the change feed after a batch commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// One or more invites under this event were created or modified
    Invites { event_id: SmolStr },
}

pub type StatsUpdate = Box<dyn FnOnce(Option<InviteStats>) -> InviteStats + Send>;

#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    async fn put_user(&self, user: User) -> Result<(), StoreError>;

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError>;

    async fn find_event_by_join_code(&self, join_code: &str) -> Result<Option<Event>, StoreError>;

    async fn get_member(&self, event_id: &str, user_id: &str) -> Result<Option<EventMembership>, StoreError>;

    async fn list_members(&self, event_id: &str) -> Result<Vec<EventMembership>, StoreError>;

    async fn get_invite(&self, event_id: &str, invite_id: &str) -> Result<Option<Invite>, StoreError>;

    /// Tokens are unique across every event, so no event id is needed.
    async fn find_invite_by_token(&self, token: &str) -> Result<Option<Invite>, StoreError>;

    async fn list_event_invites(&self, event_id: &str) -> Result<Vec<Invite>, StoreError>;

    /// All `pending` invites with `expires_at < now`
    async fn list_expired_pending(&self, now: Timestamp) -> Result<Vec<Invite>, StoreError>;

    async fn get_invite_stats(&self, user_id: &str) -> Result<Option<InviteStats>, StoreError>;

    /// Transactional read-modify-write of one user's stats record.
    async fn update_invite_stats(&self, user_id: &str, update: StatsUpdate) -> Result<InviteStats, StoreError>;

    /// Applies every write in the batch atomically.
    async fn commit(&self, batch: Batch) -> Result<(), StoreError>;

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Change>;
}
