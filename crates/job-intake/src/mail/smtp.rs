//! Fallback delivery through a plain SMTP relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::gateway::{DeliveryError, MailTransport};
use super::message::OutboundEmail;
use crate::config::SmtpConfig;

const IMPLICIT_TLS_PORT: u16 = 465;

/// Relay used when no provider key is configured. Without a relay every
/// delivery fails as unconfigured.
#[derive(Debug, Clone)]
pub struct SmtpFallback {
    relay: Option<SmtpConfig>,
}

impl SmtpFallback {
    pub fn new(relay: Option<SmtpConfig>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl MailTransport for SmtpFallback {
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let Some(relay) = self.relay.clone() else {
            return Err(DeliveryError::Unconfigured("no fallback relay configured"));
        };
        let message = build_message(email)?;

        let result = tokio::task::spawn_blocking(move || {
            let mailer = transport(&relay)?;
            mailer
                .send(&message)
                .map(|_| ())
                .map_err(|err| DeliveryError::Transport(err.to_string()))
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(err) => Err(DeliveryError::Transport(err.to_string())),
        }
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, DeliveryError> {
    raw.parse::<Mailbox>()
        .map_err(|err| DeliveryError::InvalidAddress(format!("{raw}: {err}")))
}

pub(crate) fn build_message(email: &OutboundEmail) -> Result<Message, DeliveryError> {
    Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|err| DeliveryError::Transport(err.to_string()))
}

fn transport(relay: &SmtpConfig) -> Result<SmtpTransport, DeliveryError> {
    let builder = if relay.port == IMPLICIT_TLS_PORT {
        SmtpTransport::relay(&relay.host)
    } else {
        SmtpTransport::starttls_relay(&relay.host)
    }
    .map_err(|err| DeliveryError::Transport(err.to_string()))?
    .port(relay.port);

    let builder = match (&relay.username, &relay.password) {
        (Some(username), Some(password)) => {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        }
        _ => builder,
    };

    Ok(builder.build())
}
