use std::sync::Arc;

use tracing::info;

use samarth::adapters::ai::{
    GeminiConfig, GeminiProvider, MockAIProvider, OpenAIConfig, OpenAIProvider, RetryPolicy,
};
use samarth::adapters::datasets::FileDatasetSource;
use samarth::adapters::history::{FileChatHistory, InMemoryChatHistory};
use samarth::adapters::http::{app_router, QaAppState};
use samarth::application::{AskQuestionHandler, ConversationOrchestrator, GenerationSettings};
use samarth::config::{AiConfig, AiProvider, AppConfig, DataConfig};
use samarth::domain::dataset::{DatasetKind, TabularStore};
use samarth::domain::query::ExecutorLimits;
use samarth::ports::{AIError, AIProvider, ChatHistoryRepository};
use samarth::telemetry::init_telemetry;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let retry = RetryPolicy {
        max_retries: config.max_retries,
        ..RetryPolicy::default()
    };

    let provider: Arc<dyn AIProvider> = match config.primary_provider {
        AiProvider::Gemini => {
            let key = config.gemini_api_key.clone().unwrap_or_default();
            let mut gemini = GeminiConfig::new(key)
                .with_timeout(config.timeout())
                .with_retry(retry);
            if let Some(model) = &config.model {
                gemini = gemini.with_model(model.clone());
            }
            Arc::new(GeminiProvider::new(gemini)?)
        }
        AiProvider::OpenAI => {
            let key = config.openai_api_key.clone().unwrap_or_default();
            let mut openai = OpenAIConfig::new(key)
                .with_timeout(config.timeout())
                .with_retry(retry);
            if let Some(model) = &config.model {
                openai = openai.with_model(model.clone());
            }
            Arc::new(OpenAIProvider::new(openai)?)
        }
        AiProvider::Mock => Arc::new(MockAIProvider::new()),
    };
    Ok(provider)
}

fn build_history(config: &DataConfig) -> Arc<dyn ChatHistoryRepository> {
    match &config.history_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Chat history stored as YAML files");
            Arc::new(FileChatHistory::new(dir))
        }
        None => {
            info!("Chat history kept in memory");
            Arc::new(InMemoryChatHistory::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_telemetry(&config.server.log_level, config.is_production());
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        provider = ?config.ai.primary_provider,
        "Starting Samarth"
    );

    let source = FileDatasetSource::new(&config.data.data_dir)
        .with_crop_production_file(config.data.crop_production_file.clone())
        .with_rainfall_file(config.data.rainfall_file.clone())
        .with_social_groups_file(config.data.social_groups_file.clone());
    let store = Arc::new(TabularStore::load(&source)?);
    info!(
        crop_rows = ?store.row_count(DatasetKind::CropProduction),
        rainfall_rows = ?store.row_count(DatasetKind::Rainfall),
        social_group_rows = ?store.row_count(DatasetKind::SocialGroups),
        "Datasets loaded"
    );

    let provider = build_provider(&config.ai)?;
    let history = build_history(&config.data);

    let limits = ExecutorLimits {
        top_crops: config.data.top_crops_limit,
        districts: config.data.district_limit,
    };
    let orchestrator = Arc::new(
        ConversationOrchestrator::new(provider, store.clone(), limits).with_generation(
            GenerationSettings {
                temperature: Some(config.ai.temperature),
                max_tokens: config.ai.max_tokens,
            },
        ),
    );
    let ask_handler = Arc::new(AskQuestionHandler::new(orchestrator, history.clone()));

    let state = QaAppState::new(store, history, ask_handler);
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
