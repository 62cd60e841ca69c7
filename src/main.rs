//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; the analysis flow lives in AnalysisService.

use chat_digest::adapters::ai::{MockAiAdapter, OpenAiAdapter};
use chat_digest::adapters::ui::tui::TuiInputPort;
use chat_digest::ports::{AiPort, InputPort};
use chat_digest::shared::config::AppConfig;
use chat_digest::usecases::AnalysisService;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });

    // --- AI adapter: credential is checked before any transcript is touched ---
    let timeout = Duration::from_secs(cfg.request_timeout_secs_or_default());
    let ai_adapter: Arc<dyn AiPort> = if cfg.use_mock_ai() {
        warn!("CHAT_DIGEST_AI_MOCK set, using mock AI adapter");
        Arc::new(MockAiAdapter::new())
    } else {
        let api_key = cfg
            .require_ai_api_key()
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI analysis enabled with OpenAI adapter"
        );
        Arc::new(
            OpenAiAdapter::new(
                cfg.ai_api_url_or_default(),
                api_key,
                cfg.ai_model_or_default(),
                timeout,
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    };

    // --- Services ---
    let max_concurrency = cfg.max_concurrency_or_default();
    info!(max_concurrency, "analysis pool configured");
    let analysis_service = Arc::new(AnalysisService::new(ai_adapter, max_concurrency, timeout));

    chat_digest::adapters::ui::init_ui();

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&analysis_service),
        Duration::from_millis(cfg.poll_interval_ms_or_default()),
    ));

    // --- Run (file -> participant -> prompt -> streamed summaries) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
