//! LLM Client: the single point of entry for hosted model calls.
//!
//! Every prompt the service sends goes through `CompletionModel`. The
//! production implementation is `LlmClient`, which speaks the OpenAI-style
//! HTTP API in either its chat or its legacy completions shape.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod testing;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Which request/response shape the hosted API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFlavor {
    /// `POST /chat/completions` with a single user-role message.
    #[default]
    Chat,
    /// Legacy `POST /completions` with a bare prompt string.
    Completions,
}

impl ApiFlavor {
    pub fn default_model(self) -> &'static str {
        match self {
            ApiFlavor::Chat => "gpt-3.5-turbo",
            ApiFlavor::Completions => "gpt-3.5-turbo-instruct",
        }
    }

    fn path(self) -> &'static str {
        match self {
            ApiFlavor::Chat => "chat/completions",
            ApiFlavor::Completions => "completions",
        }
    }
}

impl FromStr for ApiFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(ApiFlavor::Chat),
            "completions" | "legacy" => Ok(ApiFlavor::Completions),
            other => Err(format!("unknown API flavor '{other}' (expected 'chat' or 'completions')")),
        }
    }
}

impl fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFlavor::Chat => f.write_str("chat"),
            ApiFlavor::Completions => f.write_str("completions"),
        }
    }
}

/// A hosted model that turns one prompt into one block of text.
///
/// Carried in `AppState` as `Arc<dyn CompletionModel>` so handlers never
/// depend on the HTTP client directly.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Model identifier, for logging and the health endpoint.
    fn model(&self) -> &str;
}

/// Request body in whichever shape the configured flavor expects.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CompletionRequest<'a> {
    Chat(ChatRequest<'a>),
    Legacy(LegacyRequest<'a>),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct LegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    /// Present on chat responses.
    message: Option<ChoiceMessage>,
    /// Present on legacy completion responses.
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl CompletionResponse {
    /// Text of the first choice, whichever shape it came in.
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|choice| {
            choice
                .message
                .and_then(|m| m.content)
                .or(choice.text)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for an OpenAI-compatible completion endpoint.
/// Retries rate limits and server errors with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    flavor: ApiFlavor,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        flavor: ApiFlavor,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            flavor,
        })
    }

    pub fn flavor(&self) -> ApiFlavor {
        self.flavor
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.flavor.path())
    }

    fn request_body<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> CompletionRequest<'a> {
        match self.flavor {
            ApiFlavor::Chat => CompletionRequest::Chat(ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                max_tokens,
            }),
            ApiFlavor::Completions => CompletionRequest::Legacy(LegacyRequest {
                model: &self.model,
                prompt,
                max_tokens,
            }),
        }
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let url = self.endpoint();
        let request_body = self.request_body(prompt, max_tokens);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let parsed: CompletionResponse = response.json().await?;

            if let Some(usage) = &parsed.usage {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    self.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return parsed.into_text().ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
