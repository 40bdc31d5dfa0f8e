use crate::cli::ServeArgs;
use crate::infra::{AppState, Services};
use crate::routes::build_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_intake::config::AppConfig;
use job_intake::error::AppError;
use job_intake::storage::{self, SqlitePool};
use job_intake::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

async fn open_database(config: &AppConfig) -> Result<SqlitePool, AppError> {
    let pool = storage::connect(&config.database).await?;
    storage::migrate(&pool).await?;
    Ok(pool)
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let pool = open_database(&config).await?;
    let services = Services::wire(&config, pool.clone());

    let cron_task = config
        .cron
        .interval()
        .map(|period| services.cron.clone().spawn(period));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        pool,
    };

    let app = build_router(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job intake service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "unable to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown requested");
        })
        .await;

    if let Some(task) = cron_task {
        task.abort();
    }

    served?;
    Ok(())
}

pub(crate) async fn migrate() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    open_database(&config).await?;
    info!(url = %config.database.url, "database schema is current");
    Ok(())
}

pub(crate) async fn drain_queue() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let pool = open_database(&config).await?;
    let services = Services::wire(&config, pool);
    let report = services.cron.run_once().await?;

    info!(
        claimed = report.claimed,
        delivered = report.delivered,
        failed = report.failed,
        "follow-up queue drained"
    );
    Ok(())
}
