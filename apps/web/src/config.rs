use anyhow::{bail, Context, Result};

use crate::llm_client::ApiFlavor;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where per-browser session state lives.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionBackend {
    Memory,
    Redis { url: String },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub llm_base_url: String,
    pub llm_flavor: ApiFlavor,
    pub llm_model: String,
    pub session_backend: SessionBackend,
    pub session_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_flavor = match optional_env("LLM_API_FLAVOR") {
            Some(raw) => raw
                .parse::<ApiFlavor>()
                .map_err(|e| anyhow::anyhow!("LLM_API_FLAVOR: {e}"))?,
            None => ApiFlavor::Chat,
        };

        let llm_model =
            optional_env("LLM_MODEL").unwrap_or_else(|| llm_flavor.default_model().to_string());

        let session_backend = match optional_env("SESSION_BACKEND").as_deref() {
            None | Some("memory") => SessionBackend::Memory,
            Some("redis") => SessionBackend::Redis {
                url: require_env("REDIS_URL")?,
            },
            Some(other) => bail!("SESSION_BACKEND must be 'memory' or 'redis', got '{other}'"),
        };

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_flavor,
            llm_model,
            session_backend,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
