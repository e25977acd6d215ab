use std::sync::Arc;
use tokio::net::TcpListener;
use visitor_classifier::{
    config::Config,
    api::routes::create_router,
    llm::GeminiClient,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Refuses to start without GOOGLE_API_KEY
    let config = Config::load().inspect_err(|e| tracing::error!("Failed to configure Gemini: {}", e))?;
    let server_addr = config.server_addr;
    tracing::info!(model = %config.gemini_model, "configured Gemini client");

    let model = GeminiClient::new(&config)?;
    let app_state = AppState::new(config, Arc::new(model))?;

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
