use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;

use crate::clock::FixedClock;
use crate::mail::{DeliveryError, DeliveryFailure, DeliveryPath, MailMessage, Mailer};
use crate::workflows::job_applications::domain::{
    ApplicationId, ApplicationSubmission, JobApplication, NewJobApplication,
};
use crate::workflows::job_applications::repository::{ApplicationStore, Page, RepositoryError};
use crate::workflows::job_applications::IntakeService;
use crate::workflows::notifications::{
    ClaimedItem, NotificationQueue, QueueError, QueuedNotification,
};

pub(super) const SITE_MAIL: &str = "admin@example.com";
pub(super) const NOW: i64 = 1_700_000_000;

/// Shared, ordered record of side effects across the doubles.
pub(super) type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        name: "A".to_string(),
        email: "a@example.com".to_string(),
        category: "backend".to_string(),
        technology: "java".to_string(),
        message: "line1\nline2".to_string(),
    }
}

pub(super) fn record(id: i64) -> JobApplication {
    JobApplication {
        id: ApplicationId(id),
        name: format!("Applicant {id}"),
        email: format!("applicant{id}@example.com"),
        category: crate::workflows::job_applications::JobCategory::Frontend,
        technology: crate::workflows::job_applications::Technology::React,
        message: format!("message {id}"),
        submitted: NOW + id,
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) rows: Mutex<Vec<JobApplication>>,
    events: Option<EventLog>,
}

impl MemoryStore {
    pub(super) fn with_events(events: EventLog) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            events: Some(events),
        }
    }

    pub(super) fn seeded(count: i64) -> Self {
        Self {
            rows: Mutex::new((1..=count).map(record).collect()),
            events: None,
        }
    }

    pub(super) fn rows(&self) -> Vec<JobApplication> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert(
        &self,
        application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        if let Some(events) = &self.events {
            events.lock().expect("event mutex poisoned").push("insert");
        }
        let mut rows = self.rows.lock().expect("store mutex poisoned");
        let id = rows.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        let stored = JobApplication::from_new(ApplicationId(id), application);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(&self, page: Page) -> Result<Vec<JobApplication>, RepositoryError> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.rows.lock().expect("store mutex poisoned").len() as u64)
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl ApplicationStore for UnavailableStore {
    async fn insert(
        &self,
        _application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_recent(&self, _page: Page) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// How the scripted mailer answers every send.
#[derive(Debug, Clone)]
pub(super) enum MailScript {
    Deliver(DeliveryPath),
    Reject { message: Option<String> },
    FallbackDown,
}

pub(super) struct ScriptedMailer {
    script: MailScript,
    sent: Mutex<Vec<MailMessage>>,
    events: Option<EventLog>,
}

impl ScriptedMailer {
    pub(super) fn new(script: MailScript) -> Self {
        Self {
            script,
            sent: Mutex::new(Vec::new()),
            events: None,
        }
    }

    pub(super) fn with_events(script: MailScript, events: EventLog) -> Self {
        Self {
            events: Some(events),
            ..Self::new(script)
        }
    }

    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(&self, message: MailMessage) -> Result<DeliveryPath, DeliveryFailure> {
        if let Some(events) = &self.events {
            events.lock().expect("event mutex poisoned").push("mail");
        }
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        match &self.script {
            MailScript::Deliver(path) => Ok(*path),
            MailScript::Reject { message } => Err(DeliveryFailure {
                path: DeliveryPath::Primary,
                error: DeliveryError::Rejected {
                    status: 400,
                    message: message.clone(),
                },
            }),
            MailScript::FallbackDown => Err(DeliveryFailure {
                path: DeliveryPath::Fallback,
                error: DeliveryError::Transport("connection refused".to_string()),
            }),
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryQueue {
    pub(super) items: Mutex<VecDeque<ClaimedItem>>,
    pub(super) offline: bool,
}

impl MemoryQueue {
    pub(super) fn notifications(&self) -> Vec<QueuedNotification> {
        self.items
            .lock()
            .expect("queue mutex poisoned")
            .iter()
            .map(|item| item.notification().expect("valid payload"))
            .collect()
    }
}

#[async_trait]
impl NotificationQueue for MemoryQueue {
    async fn enqueue(
        &self,
        notification: QueuedNotification,
        created: i64,
    ) -> Result<(), QueueError> {
        if self.offline {
            return Err(QueueError::Unavailable("queue offline".to_string()));
        }
        let mut items = self.items.lock().expect("queue mutex poisoned");
        let item_id = items.len() as i64 + 1;
        items.push_back(ClaimedItem {
            item_id,
            created,
            data: serde_json::to_string(&notification).expect("serialises"),
        });
        Ok(())
    }

    async fn claim(&self, limit: usize) -> Result<Vec<ClaimedItem>, QueueError> {
        let mut items = self.items.lock().expect("queue mutex poisoned");
        let take = limit.min(items.len());
        Ok(items.drain(..take).collect())
    }

    async fn len(&self) -> Result<u64, QueueError> {
        Ok(self.items.lock().expect("queue mutex poisoned").len() as u64)
    }
}

pub(super) struct Harness<R> {
    pub(super) service: Arc<IntakeService<R, ScriptedMailer>>,
    pub(super) store: Arc<R>,
    pub(super) mailer: Arc<ScriptedMailer>,
    pub(super) queue: Arc<MemoryQueue>,
}

pub(super) fn harness_with<R>(store: R, mailer: ScriptedMailer, queue: MemoryQueue) -> Harness<R>
where
    R: ApplicationStore + 'static,
{
    let store = Arc::new(store);
    let mailer = Arc::new(mailer);
    let queue = Arc::new(queue);
    let service = Arc::new(IntakeService::new(
        store.clone(),
        mailer.clone(),
        queue.clone(),
        Arc::new(FixedClock::at_timestamp(NOW)),
        SITE_MAIL,
    ));
    Harness {
        service,
        store,
        mailer,
        queue,
    }
}

pub(super) fn harness(script: MailScript) -> Harness<MemoryStore> {
    harness_with(
        MemoryStore::default(),
        ScriptedMailer::new(script),
        MemoryQueue::default(),
    )
}

pub(super) async fn read_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub(super) fn form_body(submission: &ApplicationSubmission) -> String {
    let encode = |value: &str| {
        value
            .bytes()
            .map(|byte| match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (byte as char).to_string()
                }
                b' ' => "+".to_string(),
                other => format!("%{other:02X}"),
            })
            .collect::<String>()
    };
    format!(
        "name={}&email={}&type={}&technology={}&message={}",
        encode(&submission.name),
        encode(&submission.email),
        encode(&submission.category),
        encode(&submission.technology),
        encode(&submission.message),
    )
}
