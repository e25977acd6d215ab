use reqwest::{Client, ClientBuilder};
use scraper::node::Node;
use scraper::{ElementRef, Html};
use std::time::Duration;
use crate::error::{AppError, Result};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// Elements whose contents never count as visible text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

/// Prepends `https://` unless the input already names an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Retrieves pages over a single pooled client with a fixed timeout.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .user_agent(BROWSER_USER_AGENT)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Fetcher { client })
    }

    pub async fn fetch_html(&self, raw_url: &str) -> Result<String> {
        let url = normalize_url(raw_url);
        tracing::info!(%url, "fetching page");
        let start = std::time::Instant::now();

        let result = async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            Ok::<_, reqwest::Error>(response.text().await?)
        }
        .await;

        match result {
            Ok(html) => {
                tracing::info!(%url, bytes = html.len(), elapsed = ?start.elapsed(), "page fetched");
                Ok(html)
            }
            Err(e) => {
                tracing::error!(%url, error = %e, "failed to scrape website");
                Err(e.into())
            }
        }
    }
}

/// Flattens the visible text of `html` into a single space-separated line,
/// capped at `limit` characters.
pub fn extract_content(html: &str, limit: usize) -> Result<String> {
    // html5ever recovers from any malformed markup; NULs mean a binary payload
    if html.contains('\0') {
        tracing::error!("response body is not markup");
        return Err(AppError::ExtractionError("Failed to process website content".to_string()));
    }

    let document = Html::parse_document(html);
    let mut parts = Vec::new();
    collect_visible_text(document.root_element(), &mut parts);

    let text = parts.join(" ");
    Ok(text.chars().take(limit).collect())
}

fn collect_visible_text(el: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !normalized.is_empty() {
                    parts.push(normalized);
                }
            }
            Node::Element(element) => {
                if HIDDEN_ELEMENTS.contains(&element.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible_text(child_el, parts);
                }
            }
            _ => {}
        }
    }
}
