use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::config::SweeperConfig;
use crate::orchestrator::Orchestrator;
use crate::store::SubmissionStore;

/// Run the reconcile sweeper as a background task.
pub async fn run_reconcile_sweeper(
    db: DatabaseConnection,
    orchestrator: Orchestrator,
    config: SweeperConfig,
) {
    info!(
        interval_secs = config.interval_secs,
        stale_after_secs = config.stale_after_secs,
        batch_size = config.batch_size,
        "Starting reconcile sweeper"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));

    loop {
        interval.tick().await;

        if let Err(e) = sweep_once(&db, &orchestrator, &config).await {
            error!(error = %e, "Reconcile sweep failed");
        }
    }
}

/// Reconcile every submission pending for longer than the configured
/// threshold. Returns how many submissions were visited.
pub async fn sweep_once(
    db: &DatabaseConnection,
    orchestrator: &Orchestrator,
    config: &SweeperConfig,
) -> anyhow::Result<usize> {
    let threshold = Utc::now() - chrono::Duration::seconds(config.stale_after_secs as i64);

    let stale_ids = SubmissionStore::new(db)
        .stale_pending(threshold, config.batch_size)
        .await?;

    if stale_ids.is_empty() {
        return Ok(0);
    }

    info!(count = stale_ids.len(), "Found stale pending submissions");

    for submission_id in &stale_ids {
        if let Err(e) = orchestrator.reconcile(*submission_id).await {
            error!(
                submission_id = %submission_id,
                error = %e,
                "Failed to reconcile stale submission"
            );
        }
    }

    Ok(stale_ids.len())
}
