use smol_str::SmolStr;

macro_rules! decl_procs {
    ($($(#[$meta:meta])* $name:ident($body:ident)),* $(,)?) => {
        /// Every callable operation, tagged on the wire as `{"op": "...", "body": {...}}`
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(tag = "op", content = "body", rename_all = "camelCase")]
        pub enum Procedure {
            $($(#[$meta])* $name($body),)*
        }

        impl Procedure {
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => stringify!($name)),*
                }
            }
        }

        $(
            impl From<$body> for Procedure {
                #[inline]
                fn from(body: $body) -> Procedure {
                    Procedure::$name(body)
                }
            }
        )*
    };
}

decl_procs! {
    /// Owner-only, rate limited
    SendInvites(SendInvitesBody),
    /// No authorization needed, the token is the credential
    ValidateInviteToken(ValidateInviteTokenBody),
    AcceptInvite(AcceptInviteBody),
    /// Callers may only read their own stats
    GetInviteStats(GetInviteStatsBody),
    CreateEvent(CreateEventBody),
    JoinEvent(JoinEventBody),
    /// Delivery events posted by the mail provider
    EmailWebhook(EmailWebhookBody),
}

// missing fields decode as empty so they are rejected as invalid arguments, not parse errors

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendInvitesBody {
    pub event_id: SmolStr,
    pub emails: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateInviteTokenBody {
    pub token: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptInviteBody {
    pub token: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetInviteStatsBody {
    pub user_id: SmolStr,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEventBody {
    pub name: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinEventBody {
    pub join_code: String,
}

/// Raw provider payload, usually an array of event objects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailWebhookBody(pub serde_json::Value);
