use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::format::format_message;
use super::message::{MailMessage, OutboundEmail};
use super::sendgrid::SendGridClient;
use crate::settings::{SettingsError, SettingsStore};

/// Reasons a single delivery attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("provider rejected message with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid address {0}")]
    InvalidAddress(String),
    #[error("delivery path unavailable: {0}")]
    Unconfigured(&'static str),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl DeliveryError {
    /// Provider-supplied explanation that is safe to show to the submitter.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            DeliveryError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Which route a message took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPath {
    /// Transactional-email API authenticated with the stored key.
    Primary,
    /// SMTP relay used while no key is stored.
    Fallback,
}

impl fmt::Display for DeliveryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryPath::Primary => f.write_str("primary"),
            DeliveryPath::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{path} delivery failed: {error}")]
pub struct DeliveryFailure {
    pub path: DeliveryPath,
    #[source]
    pub error: DeliveryError,
}

/// A concrete way of getting a formatted message out of the process.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Mail delivery as seen by the workflows.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<DeliveryPath, DeliveryFailure>;
}

/// Formats messages and routes them to SendGrid or the fallback relay depending
/// on the key stored at the moment of sending.
pub struct MailGateway<S> {
    settings: Arc<S>,
    sendgrid: SendGridClient,
    fallback: Arc<dyn MailTransport>,
}

impl<S> MailGateway<S>
where
    S: SettingsStore + 'static,
{
    pub fn new(settings: Arc<S>, sendgrid: SendGridClient, fallback: Arc<dyn MailTransport>) -> Self {
        Self {
            settings,
            sendgrid,
            fallback,
        }
    }
}

#[async_trait]
impl<S> Mailer for MailGateway<S>
where
    S: SettingsStore + 'static,
{
    async fn send(&self, message: MailMessage) -> Result<DeliveryPath, DeliveryFailure> {
        let email = format_message(&message);

        let key = self.settings.load_api_key().await.map_err(|err| {
            tracing::error!(error = %err, key = message.key.as_str(), "unable to read provider key");
            DeliveryFailure {
                path: DeliveryPath::Primary,
                error: err.into(),
            }
        })?;

        if key.is_blank() {
            tracing::debug!(key = message.key.as_str(), "no provider key stored, using fallback relay");
            return match self.fallback.deliver(&email).await {
                Ok(()) => Ok(DeliveryPath::Fallback),
                Err(error) => {
                    tracing::warn!(error = %error, key = message.key.as_str(), "fallback delivery failed");
                    Err(DeliveryFailure {
                        path: DeliveryPath::Fallback,
                        error,
                    })
                }
            };
        }

        self.sendgrid
            .send(&key, &email)
            .await
            .map(|()| DeliveryPath::Primary)
            .map_err(|error| DeliveryFailure {
                path: DeliveryPath::Primary,
                error,
            })
    }
}
