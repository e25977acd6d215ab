use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::error::{Result, AppError};
use crate::api::models::{AnalyzeRequest, RespondRequest, RespondResponse};
use crate::api::response;
use crate::generator::{generate_options, generate_response, OptionSet};
use crate::scraper::extract_content;
use crate::AppState;

const ANALYZE_FAILURE: &str = "Failed to analyze website";
const RESPOND_FAILURE: &str = "Failed to generate response";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/respond", post(respond_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();
    let result = process_analyze_request(&state, payload).await;
    tracing::info!("Analyze request took: {:?}", start_time.elapsed());

    match result {
        Ok(options) => response::success(options).into_response(),
        Err(err) => failure(err, ANALYZE_FAILURE),
    }
}

async fn process_analyze_request(
    state: &AppState,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<OptionSet> {
    let url = payload
        .ok()
        .and_then(|Json(req)| req.url)
        .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("Empty URL provided".to_string()));
    }

    tracing::info!("Processing analyze request for URL: {}", url);
    let html = state.fetcher.fetch_html(url).await?;

    let content = extract_content(&html, state.config.content_char_limit)?;
    tracing::info!("Extracted {} chars of content", content.chars().count());

    let options = match generate_options(state.model.as_ref(), &content).await {
        Ok(options) => options,
        Err(e) => {
            tracing::warn!("Gemini analysis failed, serving default options: {}", e);
            OptionSet::fallback()
        }
    };

    Ok(options)
}

async fn respond_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RespondRequest>, JsonRejection>,
) -> Response {
    match process_respond_request(&state, payload).await {
        Ok(reply) => response::success(reply).into_response(),
        Err(err) => failure(err, RESPOND_FAILURE),
    }
}

async fn process_respond_request(
    state: &AppState,
    payload: std::result::Result<Json<RespondRequest>, JsonRejection>,
) -> Result<RespondResponse> {
    let required = || AppError::Validation("Option and context are required".to_string());

    let Json(req) = payload.map_err(|_| required())?;
    // Only absent or null fields are missing; any other value reaches the model
    let (option, context) = match (req.option, req.context) {
        (Some(option), Some(context)) => (prompt_text(option), prompt_text(context)),
        _ => return Err(required()),
    };

    tracing::info!("Generating response for option {:?} on {}", option, context);
    let response = generate_response(state.model.as_ref(), &option, &context).await?;

    Ok(RespondResponse { response })
}

fn prompt_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn failure(err: AppError, generic: &str) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Server error: {}", err);
    } else {
        tracing::warn!("Rejected request: {}", err);
    }

    response::error(status, err.client_message(generic)).into_response()
}
