use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::{AppError, Result};
use crate::llm::LanguageModel;

pub const OPTION_COUNT: usize = 4;

static FALLBACK_OPTIONS: Lazy<OptionSet> = Lazy::new(|| OptionSet {
    question: "What would you like to know about this website?".to_string(),
    options: vec![
        "A. General Information".to_string(),
        "B. Products and Services".to_string(),
        "C. Support and Help".to_string(),
        "D. Contact Information".to_string(),
    ],
    extra: Map::new(),
});

/// A question with exactly four labeled answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub question: String,
    pub options: Vec<String>,
    /// Any other keys the model sent, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptionSet {
    /// Served whenever the model's answer cannot be used.
    pub fn fallback() -> OptionSet {
        FALLBACK_OPTIONS.clone()
    }

    fn validate(self) -> Result<OptionSet> {
        if self.question.trim().is_empty() {
            return Err(AppError::ParseError("question is empty".to_string()));
        }
        if self.options.len() != OPTION_COUNT {
            return Err(AppError::ParseError(format!(
                "expected {} options, got {}",
                OPTION_COUNT,
                self.options.len()
            )));
        }
        if self.options.iter().any(|option| option.trim().is_empty()) {
            return Err(AppError::ParseError("options must not be empty".to_string()));
        }
        Ok(self)
    }
}

pub fn build_options_prompt(content: &str) -> String {
    let mut result = String::with_capacity(content.len() + 600);
    result.push_str("Analyze this website content and create 4 relevant categories or topics.\n");
    result.push_str("Content: ");
    result.push_str(content);
    result.push_str("\n\nRespond with only 4 options labeled A through D.\n");
    result.push_str("Respond with a single JSON object and nothing else, formatted exactly like this example:\n");
    result.push_str(
        r#"{
    "question": "What information are you looking for?",
    "options": [
        "A. Product Information",
        "B. Technical Support",
        "C. Company Overview",
        "D. Contact Details"
    ]
}"#,
    );
    result
}

pub fn build_response_prompt(option: &str, context: &str) -> String {
    format!(
        "The user selected \"{}\" on the website: {}\n\
         Provide a helpful response and ask a relevant follow-up question.\n\
         Keep the response concise and natural.",
        option, context
    )
}

/// Reads model output as a JSON option set. The text is only ever
/// deserialized; a single surrounding Markdown code fence is tolerated.
pub fn parse_option_set(raw: &str) -> Result<OptionSet> {
    let json = strip_code_fence(raw.trim());
    let parsed: OptionSet = serde_json::from_str(json)
        .map_err(|e| AppError::ParseError(format!("Invalid response format from Gemini: {}", e)))?;
    parsed.validate()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // An info string ("json") is a bare word followed by whitespace
    let info_len = body.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(body.len());
    let after = &body[info_len..];
    match after.chars().next() {
        Some(c) if c.is_whitespace() => after.trim(),
        _ => body.trim(),
    }
}

/// Asks the model for an option set describing `content`.
pub async fn generate_options(model: &dyn LanguageModel, content: &str) -> Result<OptionSet> {
    let prompt = build_options_prompt(content);
    tracing::debug!(prompt_chars = prompt.chars().count(), "requesting options");

    let reply = model.generate(&prompt).await?;
    parse_option_set(&reply)
}

/// Asks the model to follow up on a chosen option.
pub async fn generate_response(model: &dyn LanguageModel, option: &str, context: &str) -> Result<String> {
    let prompt = build_response_prompt(option, context);
    let reply = model.generate(&prompt).await?;

    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(AppError::ModelError("Gemini returned an empty response".to_string()));
    }
    Ok(trimmed.to_string())
}
