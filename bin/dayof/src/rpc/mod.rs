use ::rpc::error::{ApiError, ApiErrorKind};
use ::rpc::{Procedure, RpcRequest, RpcResponse};

use crate::prelude::*;

pub mod event;
pub mod invite;
pub mod webhook;

pub async fn dispatch(state: ServerState, request: RpcRequest) -> Result<serde_json::Value, Error> {
    let RpcRequest { auth, proc } = request;

    let auth = move || match auth {
        Some(auth) => Ok(auth),
        None => Err(Error::Common(CommonError::Unauthenticated)),
    };

    macro_rules! c {
        ($e:expr) => {
            serde_json::to_value($e.await?)?
        };
    }

    log::trace!("Dispatching {}", proc.name());

    #[rustfmt::skip]
    let value = match proc {
        Procedure::SendInvites(body)         => c!(invite::invite_send::send_invites(state, auth()?, body)),
        Procedure::ValidateInviteToken(body) => c!(invite::invite_validate::validate_invite_token(state, body)),
        Procedure::AcceptInvite(body)        => c!(invite::invite_accept::accept_invite(state, auth()?, body)),
        Procedure::GetInviteStats(body)      => c!(invite::invite_stats::get_invite_stats(state, auth()?, body)),
        Procedure::CreateEvent(body)         => c!(event::event_create::create_event(state, auth()?, body)),
        Procedure::JoinEvent(body)           => c!(event::event_join::join_event(state, auth()?, body)),
        Procedure::EmailWebhook(body)        => c!(webhook::email_events::email_webhook(body)),
    };

    Ok(value)
}

/// Handles one line of the wire protocol, a JSON [`RpcRequest`], and always produces a response.
pub async fn handle_line(state: ServerState, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("Malformed RPC request: {e}");

            return RpcResponse::Err(ApiError {
                kind: ApiErrorKind::InvalidArgument,
                message: format!("Malformed request: {e}").into(),
            });
        }
    };

    let name = request.proc.name();

    match dispatch(state, request).await {
        Ok(value) => RpcResponse::Ok(value),
        Err(e) => {
            if e.is_fatal() {
                log::error!("Error running {name}: {e}");
            } else {
                log::debug!("{name} rejected: {e}");
            }

            RpcResponse::Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    use serde_json::json;

    async fn call(h: &Harness, request: serde_json::Value) -> serde_json::Value {
        let response = handle_line(h.state.clone(), &request.to_string()).await;
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_auth_required_before_arguments() {
        let h = Harness::new();

        let res = call(&h, json!({ "proc": { "op": "sendInvites", "body": {} } })).await;
        assert_eq!(res["err"]["kind"], "unauthenticated");

        let res = call(&h, json!({ "proc": { "op": "acceptInvite", "body": { "token": "x" } } })).await;
        assert_eq!(res["err"]["kind"], "unauthenticated");

        // tokens are their own credential
        let res = call(&h, json!({ "proc": { "op": "validateInviteToken", "body": { "token": "x" } } })).await;
        assert_eq!(res["ok"], json!({ "valid": false, "error": "invalid-token" }));
    }

    #[tokio::test]
    async fn test_malformed() {
        let h = Harness::new();

        let response = handle_line(h.state.clone(), "{ not json").await;
        assert!(!response.is_ok());

        let res = call(&h, json!({ "proc": { "op": "dropTables" } })).await;
        assert_eq!(res["err"]["kind"], "invalid-argument");
    }

    #[tokio::test]
    async fn test_invite_flow() {
        let h = Harness::new();
        let auth = json!({ "userId": "u1" });

        let event = call(&h, json!({ "auth": auth, "proc": { "op": "createEvent", "body": { "name": "Picnic" } } })).await;
        let event_id = event["ok"]["eventId"].as_str().unwrap().to_owned();

        let sent = call(
            &h,
            json!({
                "auth": auth,
                "proc": { "op": "sendInvites", "body": { "eventId": event_id, "emails": ["a@x.com", "bad", "b@y.org"] } }
            }),
        )
        .await;

        assert_eq!(
            sent["ok"],
            json!({
                "success": true,
                "invitesSent": 2,
                "rateLimitInfo": { "remainingToday": 98, "remainingThisHour": 18 }
            })
        );

        let invites = h.db.list_event_invites(&event_id).await.unwrap();
        let token = invites[0].token.as_str();

        let valid = call(&h, json!({ "proc": { "op": "validateInviteToken", "body": { "token": token } } })).await;
        assert_eq!(valid["ok"]["valid"], true);
        assert_eq!(valid["ok"]["invite"]["event"]["name"], "Picnic");

        let guest = json!({ "userId": "guest" });
        let accepted = call(&h, json!({ "auth": guest, "proc": { "op": "acceptInvite", "body": { "token": token } } })).await;
        assert_eq!(accepted["ok"], json!({ "success": true, "eventId": event_id }));

        let again = call(&h, json!({ "auth": guest, "proc": { "op": "acceptInvite", "body": { "token": token } } })).await;
        assert_eq!(again["err"]["kind"], "failed-precondition");

        let used = call(&h, json!({ "proc": { "op": "validateInviteToken", "body": { "token": token } } })).await;
        assert_eq!(used["ok"]["error"], "already-used");

        let stats = call(&h, json!({ "auth": auth, "proc": { "op": "getInviteStats", "body": { "userId": "u1" } } })).await;
        assert_eq!(stats["ok"]["invitesSentToday"], 2);
        assert_eq!(stats["ok"]["maxPerHour"], 20);
    }
}
