use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::judge::JudgeClient;
use server::scratch::ScratchStore;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    server::seed::seed_role_permissions(&db)
        .await
        .context("Failed to seed roles")?;
    server::seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let llm = common::llm::backend_from_config(&config.llm).context("Failed to build LLM client")?;
    if !config.llm.is_enabled() {
        tracing::warn!("LLM API key not set, AI features use their fallback paths");
    }
    let judge = JudgeClient::new(&config.judge).context("Failed to build judge client")?;
    let scratch = ScratchStore::new(&config.scratch.dir)
        .await
        .with_context(|| format!("Failed to prepare scratch dir {}", config.scratch.dir))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        llm,
        judge: Arc::new(judge),
        scratch: Arc::new(scratch),
    };

    let app = server::build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
