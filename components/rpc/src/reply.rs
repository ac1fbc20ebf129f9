use schema::{Event, EventId, Invite, InviteStats, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub remaining_today: u32,
    pub remaining_this_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvitesReply {
    pub success: bool,
    pub invites_sent: u32,
    pub rate_limit_info: RateLimitInfo,
}

/// Invite plus the documents it points at, for the landing page shown to an invitee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteView {
    #[serde(flatten)]
    pub invite: Invite,
    pub event: Option<Event>,
    pub inviter: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InviteTokenError {
    InvalidToken,
    NotFound,
    Expired,
    AlreadyUsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateInviteReply {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<InviteView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<InviteTokenError>,
}

impl ValidateInviteReply {
    pub fn valid(invite: InviteView) -> Self {
        ValidateInviteReply {
            valid: true,
            invite: Some(invite),
            error: None,
        }
    }

    pub fn invalid(error: InviteTokenError) -> Self {
        ValidateInviteReply {
            valid: false,
            invite: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedEventReply {
    pub success: bool,
    pub event_id: EventId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteStatsReply {
    #[serde(flatten)]
    pub stats: InviteStats,
    pub max_per_hour: u32,
    pub max_per_day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: usize,
}
