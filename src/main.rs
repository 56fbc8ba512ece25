use rust_strategen::api::{run_server, AppState};
use rust_strategen::config::AppConfig;
use rust_strategen::llm::LlmClient;
use rust_strategen::pipeline::{ConversionPipeline, RetryPolicy};
use rust_strategen::render::RenderOptions;
use rust_strategen::schema::Schema;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup Logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // Pick up GROQ_API_KEY and friends from a local .env when present
    dotenvy::dotenv().ok();

    info!("Starting Strategen...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);

    // Load Generation Schema
    let schema = Schema::load(&config.schema_path)?;
    info!("📐 Loaded generation schema from {}", config.schema_path);

    // Initialize LLM Client
    info!("Initializing AI Client...");
    let api_key = config.resolved_api_key();
    let base_url = config.llm.base_url.clone();
    if let Some(url) = &base_url {
        info!("Using Custom OpenAI Base URL: {}", url);
    }
    let llm_client = LlmClient::new(
        api_key,
        base_url,
        config.llm.model.clone(),
        config.llm.temperature,
    );
    info!("Using LLM Model: {}", llm_client.model());

    // Assemble Conversion Pipeline
    let pipeline = ConversionPipeline::new(
        Arc::new(llm_client),
        &schema,
        RetryPolicy {
            max_attempts: config.retry.max_attempts,
        },
        RenderOptions {
            zero_based_sets: config.display.zero_based_sets,
        },
    );

    let app_state = Arc::new(AppState {
        pipeline,
        schema,
        config,
    });

    // Start API Server
    info!("Initializing API Server...");
    run_server(app_state).await;

    Ok(())
}
