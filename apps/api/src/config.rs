use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::LlmSettings;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            openai_api_key: require_env(&lookup, "OPENAI_API_KEY")?,
            openai_model: var_or("OPENAI_MODEL", DEFAULT_MODEL),
            openai_base_url: var_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            llm_timeout_secs: var_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            rust_log: var_or("RUST_LOG", "info"),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.openai_api_key.clone(),
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn require_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
