use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::{Client, ClientBuilder};
use crate::config::Config;
use crate::error::{Result, AppError};

/// A text-in, text-out generative model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.model_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build model client: {}", e)))?;

        Ok(GeminiClient {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.gemini_base_url, config.gemini_model
            ),
            api_key: config.google_api_key.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.into() }],
            }],
        };

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ModelError(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::ModelError(format!("Gemini returned {}: {}", status, detail)));
        }

        let reply: GenerateResponse = res
            .json()
            .await
            .map_err(|e| AppError::ModelError(format!("Invalid response format from Gemini: {}", e)))?;

        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::ModelError("Gemini returned no text".to_string()));
        }

        Ok(text)
    }
}
