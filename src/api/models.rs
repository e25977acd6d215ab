use serde::{Deserialize, Serialize};
use serde_json::Value;

// Fields are optional so that missing values surface as validation errors
// rather than extractor rejections.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub option: Option<Value>,
    pub context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub response: String,
}
