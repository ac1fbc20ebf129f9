use crate::*;

/// Tokens are 32 random bytes, hex-encoded
pub const TOKEN_BYTES: usize = 32;
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Generates a fresh invite token from the system's secure random source.
///
/// No uniqueness check is done here, the store rejects a colliding token on commit.
pub fn generate_token() -> SmolStr {
    SmolStr::new(util::rng::gen_crypto_hex::<TOKEN_BYTES>())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    /// Reserved, nothing transitions an invite here yet.
    Declined,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub invite_id: InviteId,
    pub event_id: EventId,
    pub inviter_user_id: UserId,
    /// Trimmed and lower-cased
    pub invitee_email: SmolStr,
    pub status: InviteStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<Timestamp>,
    pub token: SmolStr,
}

impl Invite {
    /// Builds a new pending invite. `expires_at` is passed in so a batch shares one value.
    pub fn pending(
        event_id: EventId,
        inviter_user_id: UserId,
        invitee_email: SmolStr,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Invite {
        Invite {
            invite_id: crate::new_id(),
            event_id,
            inviter_user_id,
            invitee_email,
            status: InviteStatus::Pending,
            created_at,
            expires_at,
            accepted_at: None,
            token: generate_token(),
        }
    }

    /// Expiry is purely by clock, regardless of whether the sweeper has flipped the status yet.
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.status == InviteStatus::Accepted
    }
}
