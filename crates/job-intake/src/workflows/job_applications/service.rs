use std::sync::Arc;

use super::domain::{ApplicationSubmission, JobApplication, ValidApplication};
use super::repository::{ApplicationStore, RepositoryError};
use super::validation::{validate, ValidationErrors};
use crate::clock::Clock;
use crate::mail::{DeliveryFailure, DeliveryPath, MailMessage, Mailer, MessageKey};
use crate::workflows::notifications::{NotificationQueue, QueuedNotification};

pub const SUBMISSION_SUBJECT: &str = "Job Application";

/// What a valid submission led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Mail went out and the row was stored.
    Recorded {
        application: JobApplication,
        path: DeliveryPath,
    },
    /// The provider refused the message; nothing was stored.
    DeliveryFailed { provider_message: Option<String> },
    /// The fallback relay failed; nothing was stored and nothing is reported.
    FallbackFailed,
}

/// Composes validation, mail delivery, storage, and the follow-up queue.
pub struct IntakeService<R, M> {
    store: Arc<R>,
    mailer: Arc<M>,
    queue: Arc<dyn NotificationQueue>,
    clock: Arc<dyn Clock>,
    site_mail: String,
}

impl<R, M> IntakeService<R, M>
where
    R: ApplicationStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(
        store: Arc<R>,
        mailer: Arc<M>,
        queue: Arc<dyn NotificationQueue>,
        clock: Arc<dyn Clock>,
        site_mail: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            queue,
            clock,
            site_mail: site_mail.into(),
        }
    }

    /// Validate, mail the site address, then store. The row is written only
    /// after the mail was accepted.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<SubmissionOutcome, IntakeError> {
        let application = validate(&submission)?;
        let message = self.compose(&application);

        let path = match self.mailer.send(message).await {
            Ok(path) => path,
            Err(DeliveryFailure {
                path: DeliveryPath::Primary,
                error,
            }) => {
                tracing::error!(error = %error, "job application mail was not delivered");
                return Ok(SubmissionOutcome::DeliveryFailed {
                    provider_message: error.provider_message().map(str::to_string),
                });
            }
            Err(DeliveryFailure {
                path: DeliveryPath::Fallback,
                error,
            }) => {
                tracing::error!(error = %error, "job application mail was not delivered by the fallback relay");
                return Ok(SubmissionOutcome::FallbackFailed);
            }
        };

        let submitted = self.clock.unix_timestamp();
        let stored = self
            .store
            .insert(application.into_new_record(submitted))
            .await?;
        tracing::info!(id = %stored.id, %path, "job application recorded");

        self.enqueue_follow_up(&stored, submitted).await;

        Ok(SubmissionOutcome::Recorded {
            application: stored,
            path,
        })
    }

    pub fn compose(&self, application: &ValidApplication) -> MailMessage {
        MailMessage {
            key: MessageKey::JobApplication,
            from: application.email.clone(),
            to: self.site_mail.clone(),
            subject: SUBMISSION_SUBJECT.to_string(),
            body: vec![
                format!("Name: {}", application.name),
                format!("Email: {}", application.email),
                format!("Type: {}", application.category.as_str()),
                format!("Technology: {}", application.technology.as_str()),
                format!("Message: {}", application.message),
            ],
        }
    }

    async fn enqueue_follow_up(&self, application: &JobApplication, created: i64) {
        let notification = QueuedNotification {
            email: application.email.clone(),
        };
        if let Err(err) = self.queue.enqueue(notification, created).await {
            tracing::warn!(id = %application.id, error = %err, "unable to queue follow-up notification");
        }
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
