use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_CONTENT_CHAR_LIMIT: usize = 1500;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Characters of extracted page text handed to the model.
    pub content_char_limit: usize,
    pub fetch_timeout: Duration,
    pub model_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("GOOGLE_API_KEY not found in environment variables".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let gemini_model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_base_url = lookup("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let content_char_limit = parse_number(&lookup, "CONTENT_CHAR_LIMIT", DEFAULT_CONTENT_CHAR_LIMIT as u64)?;
        let content_char_limit = usize::try_from(content_char_limit)
            .map_err(|e| AppError::ConfigError(format!("Invalid CONTENT_CHAR_LIMIT: {}", e)))?;
        if content_char_limit == 0 {
            return Err(AppError::ConfigError("CONTENT_CHAR_LIMIT must be greater than zero".to_string()));
        }

        let fetch_timeout = Duration::from_secs(parse_number(&lookup, "FETCH_TIMEOUT_SECS", 10)?);
        let model_timeout = Duration::from_secs(parse_number(&lookup, "MODEL_TIMEOUT_SECS", 60)?);

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            google_api_key,
            gemini_model,
            gemini_base_url,
            content_char_limit,
            fetch_timeout,
            model_timeout,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "secret")])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.content_char_limit, 1500);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.model_timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("GOOGLE_API_KEY")));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn overrides_are_honored() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("GEMINI_BASE_URL", "http://localhost:9999/"),
            ("CONTENT_CHAR_LIMIT", "500"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("MODEL_TIMEOUT_SECS", "20"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.gemini_base_url, "http://localhost:9999");
        assert_eq!(config.content_char_limit, 500);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.model_timeout, Duration::from_secs(20));
    }

    #[test]
    fn invalid_numbers_are_config_errors() {
        for (key, value) in [("PORT", "abc"), ("CONTENT_CHAR_LIMIT", "0"), ("FETCH_TIMEOUT_SECS", "-1")] {
            let result = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "secret"), (key, value)]));
            assert!(matches!(result, Err(AppError::ConfigError(_))), "{} = {}", key, value);
        }
    }

    #[test]
    fn char_limit_must_fit_in_usize() {
        let result = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("CONTENT_CHAR_LIMIT", u64::MAX.to_string().as_str()),
        ]));
        if usize::BITS < u64::BITS {
            assert!(matches!(result, Err(AppError::ConfigError(msg)) if msg.contains("CONTENT_CHAR_LIMIT")));
        } else {
            assert_eq!(result.unwrap().content_char_limit, usize::MAX);
        }
    }
}
