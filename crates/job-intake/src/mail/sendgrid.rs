//! Client for the SendGrid v3 mail-send API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::gateway::DeliveryError;
use super::message::OutboundEmail;
use crate::settings::ApiKey;

pub const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone)]
pub struct SendGridClient {
    client: Client,
    endpoint: String,
}

impl SendGridClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Only `202 Accepted` counts as delivered.
    pub async fn send(&self, api_key: &ApiKey, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let payload = MailSendRequest::from(email);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error sending email through sendgrid");
                DeliveryError::Transport(err.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "sendgrid rejected message"
        );

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            message: provider_message(&body),
        })
    }
}

/// Pulls the human-readable messages out of a `{"errors":[{"message":..}]}` body.
pub fn provider_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let messages: Vec<String> = parsed
        .errors
        .into_iter()
        .filter_map(|entry| entry.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join(" "))
    }
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    mime: &'a str,
    value: &'a str,
}

impl<'a> From<&'a OutboundEmail> for MailSendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            subject: &email.subject,
            content: [Content {
                mime: "text/plain",
                value: &email.body,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}
