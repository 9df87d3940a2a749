use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;

use wordsearch::config::AppConfig;
use wordsearch::game::{PuzzleEngine, WordBank};
use wordsearch::http_api::{self, ApiState};
use wordsearch::session_store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting word search puzzle server");

    let config = AppConfig::from_env();

    info!("Loading word bank from {}", config.server.word_bank_path.display());
    let word_bank = WordBank::from_file(&config.server.word_bank_path)?;
    let engine = PuzzleEngine::new(word_bank, config.game.clone());

    let store = SessionStore::new(config.server.max_sessions, config.server.session_ttl);
    let state = ApiState::new(engine, store);
    let app = http_api::create_app(state, &config.server);

    let http_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP API server on {}", http_addr);

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("binding {}", http_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
