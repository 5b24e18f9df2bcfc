pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod pricing;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::router::app_router;
use crate::api::types::ApiContext;
use crate::pipeline::llm::{LlmGenerate, TogetherClient};
use crate::pipeline::rag::retrieval::NoEvidence;
use crate::pipeline::textsource::PlainTextSource;
use crate::pricing::PriceTable;

/// Initialize logging, load the fee schedule, and serve the API.
pub async fn run() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Billscope starting v{}", config::APP_VERSION);

    let settings = config::Settings::from_env();
    let prices = Arc::new(PriceTable::load_or_empty(&settings.price_table_path));

    let llm: Arc<dyn LlmGenerate> = match (&settings.together_api_key, &settings.together_api_url) {
        (Some(key), Some(url)) => Arc::new(TogetherClient::new(url, key)),
        (Some(key), None) => Arc::new(TogetherClient::hosted(key)),
        (None, _) => {
            tracing::warn!("TOGETHER_API_KEY not set, explanation and appeal endpoints will fail");
            Arc::new(TogetherClient::hosted(""))
        }
    };

    let ctx = ApiContext::new(
        prices,
        Arc::new(PlainTextSource),
        Arc::new(NoEvidence),
        llm,
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "Listening");
    axum::serve(listener, app_router(ctx)).await
}
