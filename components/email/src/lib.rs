extern crate tracing as log;

use smol_str::SmolStr;
use timestamp::Timestamp;

#[macro_use]
mod macros;

pub mod mailer;
pub mod scenarios;

pub use mailer::{LogMailer, Mailer};
pub use scenarios::{Scenario, Templates};

/// One outgoing message, rendered by the mailer from its scenario.
#[derive(Debug)]
pub struct Email {
    pub to: SmolStr,
    pub subject: SmolStr,
    pub scenario: Scenario,
    pub queued_at: Timestamp,
}

impl Email {
    pub fn new(to: impl Into<SmolStr>, subject: impl Into<SmolStr>, scenario: impl Into<Scenario>) -> Email {
        Email {
            to: to.into(),
            subject: subject.into(),
            scenario: scenario.into(),
            queued_at: Timestamp::now_utc(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Template Error: {0}")]
    TemplateError(#[from] ramhorns::Error),

    #[error("Delivery Failed: {0}")]
    DeliveryFailed(String),
}
