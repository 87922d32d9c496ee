use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use judge_client::Judge0Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::orchestrator::Orchestrator;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    if let Some(dir) = &config.fixtures.dir {
        let summary = server::fixtures::import_dir(&db, dir)
            .await
            .with_context(|| format!("Failed to import fixtures from {}", dir.display()))?;
        info!(
            problems = summary.problems,
            test_cases = summary.test_cases,
            "Fixtures imported"
        );
    }

    let judge_config = config.judge_config();
    if judge_config.callback_url.is_none() {
        warn!("No judge callback URL configured, results arrive only by polling");
    }
    let judge = Judge0Client::new(&judge_config).context("Failed to create Judge0 client")?;

    let orchestrator = Orchestrator::new(
        db.clone(),
        Arc::new(judge),
        config.orchestrator.clone(),
        &config.submission,
    );

    if config.sweeper.enabled {
        tokio::spawn(server::sweeper::run_reconcile_sweeper(
            db.clone(),
            orchestrator.clone(),
            config.sweeper.clone(),
        ));
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        orchestrator,
        config,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
