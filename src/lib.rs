pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod scraper;

use std::sync::Arc;
use crate::config::Config;
use crate::llm::LanguageModel;
use crate::scraper::Fetcher;

/// Application state shared across handlers; immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<Fetcher>,
    pub model: Arc<dyn LanguageModel>,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn LanguageModel>) -> error::Result<Self> {
        let fetcher = Fetcher::new(config.fetch_timeout)?;
        Ok(AppState {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            model,
        })
    }
}
