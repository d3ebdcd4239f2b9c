pub mod config;
pub mod error;
pub mod handlers;
pub mod queue;

use common::ChatBackend;
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::error::Result;
use crate::handlers::evaluation::handle_evaluation_job;
use crate::queue::QueueService;
use server::entity::mistral_queue;

pub use config::{WorkerAppConfig, WorkerConfig};
pub use error::WorkerError;

/// What one call to [`process_batch`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub done: usize,
    pub failed: usize,
    /// Claimed by another worker between select and update.
    pub skipped: usize,
}

/// Evaluate up to `batch_size` pending jobs, oldest first.
///
/// Only the initial select can fail the batch; every per-job error is
/// recorded on the job row.
#[instrument(skip(db, backend))]
pub async fn process_batch(
    db: &DatabaseConnection,
    backend: &dyn ChatBackend,
    batch_size: u64,
) -> std::result::Result<BatchStats, DbErr> {
    let queue = QueueService::new(db);
    let jobs = queue.pending(batch_size).await?;
    let mut stats = BatchStats::default();

    for job in jobs {
        match queue.claim(job.id).await {
            Ok(true) => {}
            Ok(false) => {
                stats.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!(job_id = job.id, error = %e, "Failed to claim job");
                stats.skipped += 1;
                continue;
            }
        }

        let job_id = job.id;
        match process_job(&queue, backend, job).await {
            Ok(()) => stats.done += 1,
            Err(e) => {
                error!(job_id, error = %e, "Evaluation job failed");
                if let Err(db_err) = queue.fail(job_id, &e.to_string()).await {
                    error!(job_id, error = %db_err, "Failed to mark job as errored");
                }
                stats.failed += 1;
            }
        }
    }

    if stats != BatchStats::default() {
        info!(done = stats.done, failed = stats.failed, skipped = stats.skipped, "Batch processed");
    }
    Ok(stats)
}

async fn process_job(
    queue: &QueueService<'_, DatabaseConnection>,
    backend: &dyn ChatBackend,
    job: mistral_queue::Model,
) -> Result<()> {
    let (payload, evaluation, source) = handle_evaluation_job(backend, &job.payload).await?;

    queue
        .save_evaluation(payload.response_id, payload.session_id, &evaluation, source)
        .await?;

    let mut result = serde_json::to_value(&evaluation)?;
    if let Some(obj) = result.as_object_mut() {
        obj.insert("source".into(), json!(source));
    }
    queue.complete(job.id, result).await?;
    Ok(())
}
