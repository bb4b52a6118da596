use tokio::net::TcpListener;
use tracing::{info, warn};
use redline::{config::Config, create_router, llm::LLM, utils::init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let llm = LLM::from_config(&config.llm)?;
    if llm.is_available() {
        info!(provider = %llm.provider_name(), model = %llm.model(), "LLM client ready");
    } else {
        warn!("Running with rule-based analysis only");
    }

    tokio::fs::create_dir_all(&config.storage.projects_dir).await?;
    tokio::fs::create_dir_all(&config.storage.logs_dir).await?;

    // Create shared state
    let state = AppState::new(config.clone(), llm);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
