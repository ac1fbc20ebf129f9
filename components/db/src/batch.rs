use schema::{Event, EventMembership, Invite, InviteStatus, SmolStr, Timestamp};

#[derive(Debug, Clone)]
pub enum Write {
    /// Insert or replace an event, keeping its join code index current
    PutEvent(Event),

    /// Fails with a conflict if the user is already a member
    CreateMember(EventMembership),

    /// Adds the member if absent, an existing membership is left untouched
    JoinMember(EventMembership),

    /// Fails with a conflict if the token or invite id already exists
    CreateInvite(Invite),

    /// Moves an invite out of `from`, failing if it is no longer in that status
    TransitionInvite {
        event_id: SmolStr,
        invite_id: SmolStr,
        from: InviteStatus,
        to: InviteStatus,
        at: Option<Timestamp>,
    },

    /// Overwrites the denormalized invite counters on an event
    SetEventInviteCounters {
        event_id: SmolStr,
        pending_invites: u32,
        invited_emails: Vec<SmolStr>,
    },
}

#[derive(Debug, Default, Clone)]
pub struct Batch {
    pub(crate) writes: Vec<Write>,
}

impl Batch {
    pub fn new() -> Self {
        Batch::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Batch {
            writes: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, write: Write) -> &mut Self {
        self.writes.push(write);
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }
}

impl Extend<Write> for Batch {
    fn extend<I: IntoIterator<Item = Write>>(&mut self, iter: I) {
        self.writes.extend(iter)
    }
}

impl FromIterator<Write> for Batch {
    fn from_iter<I: IntoIterator<Item = Write>>(iter: I) -> Self {
        Batch {
            writes: iter.into_iter().collect(),
        }
    }
}
