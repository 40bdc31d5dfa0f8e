use job_intake::admin::AdminGuard;
use job_intake::clock::SystemClock;
use job_intake::config::AppConfig;
use job_intake::mail::{MailGateway, SendGridClient, SmtpFallback};
use job_intake::storage::{
    SqliteApplicationStore, SqliteNotificationQueue, SqlitePool, SqliteSettingsStore,
};
use job_intake::workflows::job_applications::IntakeService;
use job_intake::workflows::notifications::{CronRunner, NotificationWorker};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Gateway = MailGateway<SqliteSettingsStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) pool: SqlitePool,
}

/// Every collaborator, constructed once from configuration and a pool.
pub(crate) struct Services {
    pub(crate) intake: Arc<IntakeService<SqliteApplicationStore, Gateway>>,
    pub(crate) applications: Arc<SqliteApplicationStore>,
    pub(crate) settings: Arc<SqliteSettingsStore>,
    pub(crate) cron: Arc<CronRunner<Gateway>>,
    pub(crate) admin: AdminGuard,
}

impl Services {
    pub(crate) fn wire(config: &AppConfig, pool: SqlitePool) -> Self {
        let applications = Arc::new(SqliteApplicationStore::new(pool.clone()));
        let settings = Arc::new(SqliteSettingsStore::new(pool.clone()));
        let queue = Arc::new(SqliteNotificationQueue::new(pool));

        let gateway = Arc::new(MailGateway::new(
            settings.clone(),
            SendGridClient::new(config.mail.sendgrid_endpoint.clone()),
            Arc::new(SmtpFallback::new(config.mail.smtp.clone())),
        ));

        let intake = Arc::new(IntakeService::new(
            applications.clone(),
            gateway.clone(),
            queue.clone(),
            Arc::new(SystemClock),
            config.site.mail.clone(),
        ));

        let cron = Arc::new(CronRunner::new(
            queue,
            NotificationWorker::new(gateway, config.site.mail.clone()),
            config.cron.batch_limit,
        ));

        Self {
            intake,
            applications,
            settings,
            cron,
            admin: AdminGuard::new(config.admin.token.as_deref()),
        }
    }
}
