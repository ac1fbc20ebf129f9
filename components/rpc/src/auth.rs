use schema::UserId;

/// Identity of the caller, as resolved by the authentication layer in front of this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub user_id: UserId,
}

impl Authorization {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Authorization { user_id: user_id.into() }
    }

    #[inline(always)]
    pub fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    #[inline(always)]
    pub fn user_id_ref(&self) -> &UserId {
        &self.user_id
    }
}
