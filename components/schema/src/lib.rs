#[macro_use]
extern crate serde;

pub use smol_str::SmolStr;
pub use timestamp::{Duration, Timestamp};

pub mod aliases {
    use smol_str::SmolStr;

    pub type UserId = SmolStr;
    pub type EventId = SmolStr;
    pub type InviteId = SmolStr;
}

pub use aliases::*;

pub mod event;
pub mod invite;
pub mod stats;
pub mod user;
pub mod validation;

pub use event::{Event, EventMembership, MemberRole};
pub use invite::{Invite, InviteStatus};
pub use stats::{InviteLimits, InviteStats};
pub use user::User;

/// New random document id, 32 lowercase hex characters.
pub fn new_id() -> SmolStr {
    SmolStr::new(uuid::Uuid::new_v4().simple().to_string())
}
