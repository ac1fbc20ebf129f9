use smol_str::SmolStr;

use crate::{Email, MailError, Templates};

/// Outbound mail transport. Sending happens after the records it describes are
/// committed, so an error here is reported, never rolled back.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Renders each email and writes it to the log instead of delivering it.
pub struct LogMailer {
    from: SmolStr,
    templates: Templates,
}

impl LogMailer {
    pub fn new(from: impl Into<SmolStr>) -> Result<Self, MailError> {
        Ok(LogMailer {
            from: from.into(),
            templates: Templates::load()?,
        })
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let Some(body) = self.templates.render(&email.scenario) else {
            return Err(MailError::DeliveryFailed(format!("no template for {}", email.scenario.path())));
        };

        log::info!(from = %self.from, to = %email.to, subject = %email.subject, "Email queued ({} bytes)", body.len());
        log::debug!("{body}");

        Ok(())
    }
}
