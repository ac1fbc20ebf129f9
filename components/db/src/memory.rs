use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use schema::{Event, EventMembership, Invite, InviteStats, SmolStr, Timestamp, User};

use crate::{Batch, Change, StatsUpdate, Store, StoreError, Write};

#[derive(Default)]
struct Collections {
    users: HashMap<SmolStr, User>,
    events: HashMap<SmolStr, Event>,
    join_codes: HashMap<SmolStr, SmolStr>,
    /// event_id -> user_id -> membership
    members: HashMap<SmolStr, HashMap<SmolStr, EventMembership>>,
    /// event_id -> invite_id -> invite
    invites: HashMap<SmolStr, HashMap<SmolStr, Invite>>,
    /// token -> (event_id, invite_id)
    tokens: HashMap<SmolStr, (SmolStr, SmolStr)>,
    invite_stats: HashMap<SmolStr, InviteStats>,
}

/// In-process [`Store`], all collections live behind a single lock so
/// a batch commit is observed entirely or not at all.
pub struct MemoryStore {
    data: RwLock<Collections>,
    changes: broadcast::Sender<Change>,
    fail_next_commit: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            data: RwLock::new(Collections::default()),
            changes: broadcast::channel(256).0,
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// Makes the next [`Store::commit`] fail as if the backend were unreachable.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Inserts an invite directly, bypassing batch checks and the change feed. Meant for seeding.
    pub fn insert_invite(&self, invite: Invite) {
        let mut data = self.data.write();

        data.tokens.insert(invite.token.clone(), (invite.event_id.clone(), invite.invite_id.clone()));
        data.invites.entry(invite.event_id.clone()).or_default().insert(invite.invite_id.clone(), invite);
    }

    /// Replaces a user's stats directly. Meant for seeding.
    pub fn insert_invite_stats(&self, user_id: &str, stats: InviteStats) {
        self.data.write().invite_stats.insert(SmolStr::new(user_id), stats);
    }
}

impl Collections {
    fn invite(&self, event_id: &str, invite_id: &str) -> Option<&Invite> {
        self.invites.get(event_id).and_then(|invites| invites.get(invite_id))
    }

    fn is_member(&self, event_id: &str, user_id: &str) -> bool {
        self.members.get(event_id).is_some_and(|members| members.contains_key(user_id))
    }

    /// Checks every write against current state plus the writes ahead of it in the same batch.
    fn validate(&self, batch: &Batch) -> Result<(), StoreError> {
        let mut new_tokens: HashSet<&str> = HashSet::new();
        let mut new_members: HashSet<(&str, &str)> = HashSet::new();
        let mut transitioned: HashSet<(&str, &str)> = HashSet::new();

        for write in batch.writes() {
            match write {
                Write::PutEvent(event) => {
                    if let Some(owner) = self.join_codes.get(&event.join_code) {
                        if *owner != event.event_id {
                            return Err(StoreError::Conflict("join code already in use"));
                        }
                    }
                }
                Write::CreateMember(member) => {
                    let key = (member.event_id.as_str(), member.user_id.as_str());

                    if self.is_member(key.0, key.1) || !new_members.insert(key) {
                        return Err(StoreError::Conflict("already a member"));
                    }
                }
                Write::JoinMember(member) => {
                    new_members.insert((member.event_id.as_str(), member.user_id.as_str()));
                }
                Write::CreateInvite(invite) => {
                    if self.tokens.contains_key(&invite.token) || !new_tokens.insert(invite.token.as_str()) {
                        return Err(StoreError::Conflict("duplicate invite token"));
                    }

                    if self.invite(&invite.event_id, &invite.invite_id).is_some() {
                        return Err(StoreError::Conflict("duplicate invite id"));
                    }
                }
                Write::TransitionInvite {
                    event_id,
                    invite_id,
                    from,
                    ..
                } => {
                    let Some(invite) = self.invite(event_id, invite_id) else {
                        return Err(StoreError::NotFound("invite"));
                    };

                    if invite.status != *from || !transitioned.insert((event_id.as_str(), invite_id.as_str())) {
                        return Err(StoreError::Precondition("invite status changed"));
                    }
                }
                Write::SetEventInviteCounters { event_id, .. } => {
                    if !self.events.contains_key(event_id) {
                        return Err(StoreError::NotFound("event"));
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies a validated batch, returning the events whose invites changed.
    fn apply(&mut self, batch: Batch) -> Vec<SmolStr> {
        let mut touched: Vec<SmolStr> = Vec::new();

        let mut touch = |event_id: &SmolStr| {
            if !touched.contains(event_id) {
                touched.push(event_id.clone());
            }
        };

        for write in batch.writes {
            match write {
                Write::PutEvent(event) => {
                    if let Some(old) = self.events.get(&event.event_id) {
                        if old.join_code != event.join_code {
                            self.join_codes.remove(&old.join_code);
                        }
                    }

                    self.join_codes.insert(event.join_code.clone(), event.event_id.clone());
                    self.events.insert(event.event_id.clone(), event);
                }
                Write::CreateMember(member) => {
                    self.members
                        .entry(member.event_id.clone())
                        .or_default()
                        .insert(member.user_id.clone(), member);
                }
                Write::JoinMember(member) => {
                    self.members
                        .entry(member.event_id.clone())
                        .or_default()
                        .entry(member.user_id.clone())
                        .or_insert(member);
                }
                Write::CreateInvite(invite) => {
                    touch(&invite.event_id);

                    self.tokens.insert(invite.token.clone(), (invite.event_id.clone(), invite.invite_id.clone()));
                    self.invites.entry(invite.event_id.clone()).or_default().insert(invite.invite_id.clone(), invite);
                }
                Write::TransitionInvite {
                    event_id,
                    invite_id,
                    to,
                    at,
                    ..
                } => {
                    touch(&event_id);

                    if let Some(invite) = self.invites.get_mut(&event_id).and_then(|i| i.get_mut(&invite_id)) {
                        invite.status = to;

                        if to == schema::InviteStatus::Accepted {
                            invite.accepted_at = at;
                        }
                    }
                }
                Write::SetEventInviteCounters {
                    event_id,
                    pending_invites,
                    invited_emails,
                } => {
                    if let Some(event) = self.events.get_mut(&event_id) {
                        event.pending_invites = pending_invites;
                        event.invited_emails = invited_emails;
                    }
                }
            }
        }

        touched
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.data.read().users.get(user_id).cloned())
    }

    async fn put_user(&self, user: User) -> Result<(), StoreError> {
        self.data.write().users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.data.read().events.get(event_id).cloned())
    }

    async fn find_event_by_join_code(&self, join_code: &str) -> Result<Option<Event>, StoreError> {
        let data = self.data.read();

        Ok(data.join_codes.get(join_code).and_then(|id| data.events.get(id)).cloned())
    }

    async fn get_member(&self, event_id: &str, user_id: &str) -> Result<Option<EventMembership>, StoreError> {
        Ok(self.data.read().members.get(event_id).and_then(|m| m.get(user_id)).cloned())
    }

    async fn list_members(&self, event_id: &str) -> Result<Vec<EventMembership>, StoreError> {
        let data = self.data.read();

        let mut members: Vec<_> = data.members.get(event_id).map(|m| m.values().cloned().collect()).unwrap_or_default();
        members.sort_by(|a: &EventMembership, b| a.joined_at.cmp(&b.joined_at));

        Ok(members)
    }

    async fn get_invite(&self, event_id: &str, invite_id: &str) -> Result<Option<Invite>, StoreError> {
        Ok(self.data.read().invite(event_id, invite_id).cloned())
    }

    async fn find_invite_by_token(&self, token: &str) -> Result<Option<Invite>, StoreError> {
        let data = self.data.read();

        Ok(match data.tokens.get(token) {
            Some((event_id, invite_id)) => data.invite(event_id, invite_id).cloned(),
            None => None,
        })
    }

    async fn list_event_invites(&self, event_id: &str) -> Result<Vec<Invite>, StoreError> {
        let data = self.data.read();

        let mut invites: Vec<_> = data.invites.get(event_id).map(|i| i.values().cloned().collect()).unwrap_or_default();
        invites.sort_by(|a: &Invite, b| a.created_at.cmp(&b.created_at));

        Ok(invites)
    }

    async fn list_expired_pending(&self, now: Timestamp) -> Result<Vec<Invite>, StoreError> {
        let data = self.data.read();

        Ok(data
            .invites
            .values()
            .flat_map(|invites| invites.values())
            .filter(|invite| invite.status == schema::InviteStatus::Pending && invite.expires_at < now)
            .cloned()
            .collect())
    }

    async fn get_invite_stats(&self, user_id: &str) -> Result<Option<InviteStats>, StoreError> {
        Ok(self.data.read().invite_stats.get(user_id).cloned())
    }

    async fn update_invite_stats(&self, user_id: &str, update: StatsUpdate) -> Result<InviteStats, StoreError> {
        let mut data = self.data.write();

        let current = data.invite_stats.get(user_id).cloned();
        let next = update(current);

        data.invite_stats.insert(SmolStr::new(user_id), next.clone());

        Ok(next)
    }

    async fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected commit failure".to_owned()));
        }

        let len = batch.len();

        let touched = {
            let mut data = self.data.write();

            data.validate(&batch)?;
            data.apply(batch)
        };

        log::trace!("Committed batch of {len} writes");

        for event_id in touched {
            // no subscribers is fine
            let _ = self.changes.send(Change::Invites { event_id });
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use schema::{Duration, InviteStatus, MemberRole};

    fn now() -> Timestamp {
        util::time::from_unix_ms(1_709_726_400_000)
    }

    fn invite(event_id: &str, email: &str, expires_at: Timestamp) -> Invite {
        Invite::pending(event_id.into(), "owner".into(), email.into(), now(), expires_at)
    }

    fn event(event_id: &str, join_code: &str) -> Event {
        Event {
            event_id: event_id.into(),
            name: "Wedding".into(),
            owner_id: "owner".into(),
            join_code: join_code.into(),
            created_at: now(),
            pending_invites: 0,
            invited_emails: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_token_lookup_across_events() {
        let store = MemoryStore::new();
        let week = now().saturating_add(Duration::days(7));

        let a = invite("e1", "a@x.com", week);
        let b = invite("e2", "b@x.com", week);

        let batch: Batch = [Write::CreateInvite(a.clone()), Write::CreateInvite(b.clone())].into_iter().collect();
        store.commit(batch).await.unwrap();

        assert_eq!(store.find_invite_by_token(&b.token).await.unwrap(), Some(b));
        assert_eq!(store.find_invite_by_token(&a.token).await.unwrap().unwrap().event_id, "e1");
        assert_eq!(store.find_invite_by_token("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_token_rejects_whole_batch() {
        let store = MemoryStore::new();
        let week = now().saturating_add(Duration::days(7));

        let a = invite("e1", "a@x.com", week);
        let mut b = invite("e1", "b@x.com", week);
        b.token = a.token.clone();

        let mut batch = Batch::new();
        batch.push(Write::CreateInvite(a)).push(Write::CreateInvite(b));

        assert!(matches!(store.commit(batch).await, Err(StoreError::Conflict(_))));
        assert!(store.list_event_invites("e1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transition_precondition() {
        let store = MemoryStore::new();
        let a = invite("e1", "a@x.com", now());
        store.insert_invite(a.clone());

        let accept = || Write::TransitionInvite {
            event_id: a.event_id.clone(),
            invite_id: a.invite_id.clone(),
            from: InviteStatus::Pending,
            to: InviteStatus::Accepted,
            at: Some(now()),
        };

        store.commit([accept()].into_iter().collect()).await.unwrap();

        let stored = store.get_invite("e1", &a.invite_id).await.unwrap().unwrap();
        assert_eq!(stored.status, InviteStatus::Accepted);
        assert_eq!(stored.accepted_at, Some(now()));

        assert!(matches!(
            store.commit([accept()].into_iter().collect()).await,
            Err(StoreError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_failure_writes_nothing() {
        let store = MemoryStore::new();
        let a = invite("e1", "a@x.com", now());
        store.insert_invite(a.clone());

        let mut batch = Batch::new();
        batch
            .push(Write::TransitionInvite {
                event_id: a.event_id.clone(),
                invite_id: a.invite_id.clone(),
                from: InviteStatus::Pending,
                to: InviteStatus::Accepted,
                at: Some(now()),
            })
            .push(Write::CreateMember(EventMembership {
                user_id: "guest".into(),
                event_id: "e1".into(),
                joined_at: now(),
                role: MemberRole::Member,
                invited_by: Some("owner".into()),
            }));

        store.fail_next_commit();
        assert!(store.commit(batch.clone()).await.unwrap_err().is_fatal());

        assert_eq!(store.get_invite("e1", &a.invite_id).await.unwrap().unwrap().status, InviteStatus::Pending);
        assert!(store.get_member("e1", "guest").await.unwrap().is_none());

        // only the next commit fails
        store.commit(batch).await.unwrap();
        assert!(store.get_member("e1", "guest").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_join_member_keeps_existing() {
        let store = MemoryStore::new();

        let member = |user_id: &str, role| EventMembership {
            user_id: user_id.into(),
            event_id: "e1".into(),
            joined_at: now(),
            role,
            invited_by: None,
        };

        store.commit([Write::CreateMember(member("owner", MemberRole::Owner))].into_iter().collect()).await.unwrap();

        let batch: Batch = [
            Write::JoinMember(member("owner", MemberRole::Member)),
            Write::JoinMember(member("guest", MemberRole::Member)),
        ]
        .into_iter()
        .collect();

        store.commit(batch).await.unwrap();

        assert_eq!(store.get_member("e1", "owner").await.unwrap().unwrap().role, MemberRole::Owner);
        assert_eq!(store.get_member("e1", "guest").await.unwrap().unwrap().role, MemberRole::Member);

        // a plain create after a join in the same batch still conflicts
        let batch: Batch = [
            Write::JoinMember(member("third", MemberRole::Member)),
            Write::CreateMember(member("third", MemberRole::Member)),
        ]
        .into_iter()
        .collect();

        assert!(matches!(store.commit(batch).await, Err(StoreError::Conflict(_))));
        assert!(store.get_member("e1", "third").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_pending_query() {
        let store = MemoryStore::new();

        let past = now().saturating_sub(Duration::hours(1));
        let future = now().saturating_add(Duration::hours(1));

        let old = invite("e1", "old@x.com", past);
        let mut used = invite("e1", "used@x.com", past);
        used.status = InviteStatus::Accepted;

        store.insert_invite(old.clone());
        store.insert_invite(used);
        store.insert_invite(invite("e2", "fresh@x.com", future));

        let expired = store.list_expired_pending(now()).await.unwrap();
        assert_eq!(expired, vec![old]);
    }

    #[tokio::test]
    async fn test_change_feed_and_join_codes() {
        let store = MemoryStore::new();
        let mut changes = store.subscribe();

        let mut batch = Batch::new();
        batch
            .push(Write::PutEvent(event("e1", "ABC123")))
            .push(Write::CreateInvite(invite("e1", "a@x.com", now())));
        store.commit(batch).await.unwrap();

        assert_eq!(changes.try_recv().unwrap(), Change::Invites { event_id: "e1".into() });
        assert!(changes.try_recv().is_err());

        assert_eq!(store.find_event_by_join_code("ABC123").await.unwrap().unwrap().event_id, "e1");

        let taken = store.commit([Write::PutEvent(event("e2", "ABC123"))].into_iter().collect()).await;
        assert!(matches!(taken, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_stats_update_is_read_modify_write() {
        let store = MemoryStore::new();

        for _ in 0..3 {
            store
                .update_invite_stats(
                    "u",
                    Box::new(|current| {
                        let mut stats = current.unwrap_or_else(|| InviteStats::fresh(now()));
                        stats.record(2, now());
                        stats
                    }),
                )
                .await
                .unwrap();
        }

        let stats = store.get_invite_stats("u").await.unwrap().unwrap();
        assert_eq!(stats.invites_sent_today, 6);
    }
}
