/// Identifies which flow produced a message so formatting can differ per flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Submission notice sent to the site address from the applicant.
    JobApplication,
    /// Deferred follow-up sent to the applicant by the queue worker.
    QueuedNotification,
}

impl MessageKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageKey::JobApplication => "job_application_mail",
            MessageKey::QueuedNotification => "job_application_queued_mail",
        }
    }
}

/// Message as composed by a workflow, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub key: MessageKey,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: Vec<String>,
}

/// Plain-text message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}
