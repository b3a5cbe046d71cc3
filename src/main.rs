use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use socrates::catalog::{StepCatalog, SummaryCatalog};
use socrates::config::AppConfig;
use socrates::flow::FlowEngine;
use socrates::llm::create_provider;
use socrates::routes::{AppState, session_routes};
use socrates::summary::SummaryGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    // ── Catalogs ─────────────────────────────────────────────────────────
    let steps = StepCatalog::from_path(&config.questions_csv).with_context(|| {
        format!(
            "Failed to load questions from {}",
            config.questions_csv.display()
        )
    })?;
    let summaries = SummaryCatalog::from_path(&config.summaries_csv).with_context(|| {
        format!(
            "Failed to load summary mappings from {}",
            config.summaries_csv.display()
        )
    })?;

    // ── Summary generation ───────────────────────────────────────────────
    let generator = match config.llm_config() {
        Some(llm_config) => SummaryGenerator::new(create_provider(&llm_config)?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; summaries will be unavailable");
            SummaryGenerator::unconfigured()
        }
    };

    eprintln!("🧭 Socrates v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Questions: {} steps", steps.len());
    eprintln!("   Summaries: {} mappings", summaries.len());
    eprintln!(
        "   Model: {}",
        generator.default_model().unwrap_or("(no credential)")
    );
    eprintln!("   API: http://{}/api/session\n", config.bind_addr);

    let engine = Arc::new(FlowEngine::new(
        Arc::new(steps),
        Arc::new(summaries),
        Arc::new(generator),
    ));
    let app = session_routes(AppState::new(engine)).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Socrates server started");
    axum::serve(listener, app).await?;

    Ok(())
}
