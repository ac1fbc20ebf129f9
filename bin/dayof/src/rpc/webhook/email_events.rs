use rpc::procedure::EmailWebhookBody;
use rpc::reply::WebhookAck;
use serde_json::Value;

use crate::prelude::*;

/// Receives delivery events from the mail provider. Events are logged and acknowledged, nothing is stored.
pub async fn email_webhook(body: EmailWebhookBody) -> Result<WebhookAck, Error> {
    let events = match body.0 {
        Value::Array(events) => events,
        Value::Null => Vec::new(),
        event => vec![event],
    };

    log::info!("Received {} email provider events", events.len());

    for event in &events {
        let kind = event.get("event").and_then(Value::as_str).unwrap_or("unknown");
        let email = event.get("email").and_then(Value::as_str).unwrap_or("");

        log::debug!(kind, email, "email provider event");
    }

    Ok(WebhookAck { received: events.len() })
}
