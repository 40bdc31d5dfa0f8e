use std::sync::Arc;

use super::queue::QueuedNotification;
use crate::mail::{DeliveryFailure, DeliveryPath, MailMessage, Mailer, MessageKey};

pub const FOLLOW_UP_SUBJECT: &str = "Job Application Cron";

pub const FOLLOW_UP_BODY: &str = "Thank you for your interest in joining our team. \
We have received your application and will get back to you as soon as it has been reviewed.";

/// Sends the generic follow-up for one queued item. Failures are returned to
/// the caller and never retried here.
pub struct NotificationWorker<M> {
    mailer: Arc<M>,
    site_mail: String,
}

impl<M> NotificationWorker<M>
where
    M: Mailer + 'static,
{
    pub fn new(mailer: Arc<M>, site_mail: impl Into<String>) -> Self {
        Self {
            mailer,
            site_mail: site_mail.into(),
        }
    }

    pub fn message_for(&self, notification: &QueuedNotification) -> MailMessage {
        MailMessage {
            key: MessageKey::QueuedNotification,
            from: self.site_mail.clone(),
            to: notification.email.clone(),
            subject: FOLLOW_UP_SUBJECT.to_string(),
            body: vec![FOLLOW_UP_BODY.to_string()],
        }
    }

    pub async fn process_item(
        &self,
        notification: &QueuedNotification,
    ) -> Result<DeliveryPath, DeliveryFailure> {
        self.mailer.send(self.message_for(notification)).await
    }
}
