//! Deferred follow-up mail: the queue contract, the per-item worker, and the
//! runner that drains the queue outside the request path.

pub mod cron;
pub mod queue;
pub mod worker;

pub use cron::{CronReport, CronRunner};
pub use queue::{ClaimedItem, NotificationQueue, QueueError, QueuedNotification, QUEUE_NAME};
pub use worker::{NotificationWorker, FOLLOW_UP_BODY, FOLLOW_UP_SUBJECT};
