use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use worker::{WorkerAppConfig, process_batch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WorkerAppConfig::load().context("Failed to load config")?;
    info!(worker_id = %config.worker.id, "Worker starting");

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    let backend =
        common::llm::backend_from_config(&config.llm).context("Failed to build LLM client")?;
    if !config.llm.is_enabled() {
        warn!("LLM disabled, answers will be scored with the fallback heuristic");
    }

    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.worker.poll_interval_secs.max(1)));
    info!(
        batch_size = config.worker.batch_size,
        poll_interval_secs = config.worker.poll_interval_secs,
        "Polling evaluation queue"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = process_batch(&db, backend.as_ref(), config.worker.batch_size).await {
                    error!(error = %e, "Failed to fetch pending jobs");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
