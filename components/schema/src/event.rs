use crate::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: EventId,
    pub name: SmolStr,
    pub owner_id: UserId,
    /// Short code members can type in to join without an invite
    pub join_code: SmolStr,
    pub created_at: Timestamp,

    // denormalized from the event's invites
    #[serde(default)]
    pub pending_invites: u32,
    #[serde(default)]
    pub invited_emails: Vec<SmolStr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMembership {
    pub user_id: UserId,
    pub event_id: EventId,
    pub joined_at: Timestamp,
    pub role: MemberRole,
    pub invited_by: Option<UserId>,
}
