use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::queue::{NotificationQueue, QueueError};
use super::worker::NotificationWorker;
use crate::mail::Mailer;

/// Counts from one drain of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CronReport {
    pub claimed: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Drains the follow-up queue in batches, handing each item to the worker once.
pub struct CronRunner<M> {
    queue: Arc<dyn NotificationQueue>,
    worker: NotificationWorker<M>,
    batch_limit: usize,
}

impl<M> CronRunner<M>
where
    M: Mailer + 'static,
{
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        worker: NotificationWorker<M>,
        batch_limit: usize,
    ) -> Self {
        Self {
            queue,
            worker,
            batch_limit,
        }
    }

    /// Claims one batch and processes it. Items that fail are logged and dropped.
    pub async fn run_once(&self) -> Result<CronReport, QueueError> {
        let items = self.queue.claim(self.batch_limit).await?;
        let mut report = CronReport {
            claimed: items.len(),
            ..CronReport::default()
        };

        for item in items {
            let notification = match item.notification() {
                Ok(notification) => notification,
                Err(err) => {
                    tracing::warn!(item_id = item.item_id, error = %err, "dropping queue item");
                    report.failed += 1;
                    continue;
                }
            };

            match self.worker.process_item(&notification).await {
                Ok(path) => {
                    tracing::debug!(item_id = item.item_id, %path, "follow-up notification sent");
                    report.delivered += 1;
                }
                Err(failure) => {
                    tracing::warn!(
                        item_id = item.item_id,
                        path = %failure.path,
                        error = %failure.error,
                        "follow-up notification failed"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.claimed > 0 {
            tracing::info!(
                claimed = report.claimed,
                delivered = report.delivered,
                failed = report.failed,
                "notification queue drained"
            );
        }
        Ok(report)
    }

    /// Runs `run_once` every `period` until the task is aborted.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    tracing::error!(error = %err, "notification queue drain failed");
                }
            }
        })
    }
}
